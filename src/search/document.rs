use super::schema::{normalize, SearchField};
use super::{search_frames, SearchOutcome};
use crate::excel::ExcelImporter;
use crate::frame::Frame;
use crate::upload::UploadedFile;
use crate::warning::Warning;
use tracing::{info, warn};

/// Search over already-English document-details spreadsheets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSearch {
    pub column: SearchField,
    pub value: String,
}

impl DocumentSearch {
    pub fn new(column: SearchField, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    /// Load, normalize and search every upload in order.
    ///
    /// Files that fail to load or match no known layout are skipped with a
    /// warning naming the file.
    pub fn run(&self, uploads: &[UploadedFile]) -> SearchOutcome {
        let mut warnings = Vec::new();
        let mut frames: Vec<Frame> = Vec::new();

        for upload in uploads {
            let frame = match ExcelImporter::new(upload).import() {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(file = %upload.name(), error = %e, "Skipping file");
                    warnings.push(Warning::from_load_error(upload.name(), &e));
                    continue;
                }
            };

            match normalize(&frame) {
                Ok((normalized, format)) => {
                    info!(file = %upload.name(), ?format, rows = normalized.height(), "Accepted file");
                    frames.push(normalized);
                }
                Err(warning) => {
                    warn!(file = %upload.name(), "Columns match no known layout");
                    warnings.push(warning);
                }
            }
        }

        let (table, search_warnings) = search_frames(
            &frames,
            self.column.column(),
            self.column.label(),
            &self.value,
        );
        warnings.extend(search_warnings);

        SearchOutcome {
            label: self.column.label().to_string(),
            query: self.value.clone(),
            table,
            warnings,
        }
    }
}
