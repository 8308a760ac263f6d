//! Uploaded spreadsheets
//!
//! The CLI hands the core a path; the HTTP server hands it the bytes of a
//! multipart field. Both carry the original file name, which is what every
//! warning and export name refers to.

use crate::error::{DocSearchError, DocSearchResult};
use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Extensions accepted by the upload collaborators
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xls", "xlsx"];

#[derive(Debug, Clone)]
enum UploadContent {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A spreadsheet supplied by the user
#[derive(Debug, Clone)]
pub struct UploadedFile {
    name: String,
    content: UploadContent,
}

impl UploadedFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            content: UploadContent::Path(path.to_path_buf()),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content: UploadContent::Bytes(bytes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the file name ends in `.xls` or `.xlsx` (any case)
    pub fn has_supported_extension(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|s| e.eq_ignore_ascii_case(s))
            })
            .unwrap_or(false)
    }

    /// Read the file content.
    ///
    /// A permission failure on a path upload is reported as
    /// [`DocSearchError::PermissionDenied`] so callers can warn about a file
    /// held open by another application.
    pub fn read(&self) -> DocSearchResult<Cow<'_, [u8]>> {
        match &self.content {
            UploadContent::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            UploadContent::Path(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|e| read_error(&self.name, e)),
        }
    }
}

/// Classify a failed read of the file named `file`
fn read_error(file: &str, error: std::io::Error) -> DocSearchError {
    match error.kind() {
        ErrorKind::PermissionDenied => DocSearchError::PermissionDenied {
            file: file.to_string(),
        },
        _ => DocSearchError::Io(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_path() {
        let upload = UploadedFile::from_path("/tmp/data/Pune_2023.xlsx");
        assert_eq!(upload.name(), "Pune_2023.xlsx");
        assert!(upload.has_supported_extension());
    }

    #[test]
    fn test_supported_extensions() {
        assert!(UploadedFile::from_bytes("a.XLS", Vec::new()).has_supported_extension());
        assert!(!UploadedFile::from_bytes("a.csv", Vec::new()).has_supported_extension());
        assert!(!UploadedFile::from_bytes("noext", Vec::new()).has_supported_extension());
    }

    #[test]
    fn test_read_bytes_borrows() {
        let upload = UploadedFile::from_bytes("a.xlsx", vec![1, 2, 3]);
        assert_eq!(upload.read().unwrap().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_read_missing_path_is_io_error() {
        let upload = UploadedFile::from_path("/nonexistent/file.xlsx");
        assert!(matches!(upload.read(), Err(DocSearchError::Io(_))));
    }

    #[test]
    fn test_read_error_classification() {
        let denied = std::io::Error::from(ErrorKind::PermissionDenied);
        assert!(matches!(
            read_error("locked.xlsx", denied),
            DocSearchError::PermissionDenied { ref file } if file == "locked.xlsx"
        ));

        let missing = std::io::Error::from(ErrorKind::NotFound);
        assert!(matches!(read_error("gone.xlsx", missing), DocSearchError::Io(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_unreadable_path_is_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("locked.xlsx");
        std::fs::write(&path, b"data").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores file modes
        if std::fs::read(&path).is_ok() {
            return;
        }

        let upload = UploadedFile::from_path(&path);
        let err = upload.read().unwrap_err();
        assert!(matches!(
            err,
            DocSearchError::PermissionDenied { ref file } if file == "locked.xlsx"
        ));
        assert!(err.to_string().contains("not open in another application"));
    }
}
