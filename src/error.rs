use thiserror::Error;

pub type DocSearchResult<T> = Result<T, DocSearchError>;

#[derive(Error, Debug)]
pub enum DocSearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Permission denied for file {file}. Ensure it is not open in another application.")]
    PermissionDenied { file: String },

    #[error("Failed to read workbook {file}: {message}")]
    Workbook { file: String, message: String },

    #[error("Export error: {0}")]
    Export(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
