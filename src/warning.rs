//! Non-fatal conditions surfaced to the operator
//!
//! A warning names the offending file or column; the batch carries on
//! without it.

use crate::error::DocSearchError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// File locked or unreadable for the current user
    PermissionDenied { file: String },
    /// Any other failure to open or parse the workbook
    LoadFailed { file: String, message: String },
    /// Columns match neither known upstream format
    SchemaMismatch { file: String },
    /// The searched column is absent from a frame
    MissingColumn { column: String, file: String },
    /// The translated workbook could not be written
    ExportFailed { file: String, message: String },
}

impl Warning {
    /// Classify a load error for `file`
    pub fn from_load_error(file: &str, error: &DocSearchError) -> Self {
        match error {
            DocSearchError::PermissionDenied { .. } => Warning::PermissionDenied {
                file: file.to_string(),
            },
            other => Warning::LoadFailed {
                file: file.to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::PermissionDenied { file } => write!(
                f,
                "Permission denied for file {}. Ensure it is not open in another application.",
                file
            ),
            Warning::LoadFailed { file, message } => {
                write!(f, "An error occurred with file {}: {}", file, message)
            }
            Warning::SchemaMismatch { file } => write!(
                f,
                "File {} does not match the expected column sets and will be skipped.",
                file
            ),
            Warning::MissingColumn { column, file } => {
                write!(f, "Selected column '{}' not found in file {}.", column, file)
            }
            Warning::ExportFailed { file, message } => {
                write!(f, "Could not write translated copy of {}: {}", file, message)
            }
        }
    }
}
