//! Excel exporter implementation

use crate::error::{DocSearchError, DocSearchResult};
use crate::frame::Frame;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

/// Prefix put in front of the original file name of every export
pub const EXPORT_PREFIX: &str = "translated_";

/// Name of the export written for `original_name`.
///
/// The writer only produces `.xlsx`, so a legacy `.xls` name keeps its stem
/// and gets the `.xlsx` extension.
pub fn export_file_name(original_name: &str) -> String {
    let path = Path::new(original_name);
    let is_xls = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xls"))
        .unwrap_or(false);

    if is_xls {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}{}.xlsx", EXPORT_PREFIX, stem)
    } else {
        format!("{}{}", EXPORT_PREFIX, original_name)
    }
}

/// Writes translated frames to `.xlsx` files in one output directory
pub struct ExcelExporter {
    output_dir: PathBuf,
}

impl ExcelExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Build the workbook for a frame: one worksheet, header row, no index
    pub fn to_workbook(frame: &Frame) -> DocSearchResult<Workbook> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();

        for (col, name) in frame.columns.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, name, &header)
                .map_err(|e| DocSearchError::Export(format!("Failed to write header: {}", e)))?;
        }

        for (row_idx, row) in frame.rows.iter().enumerate() {
            for (col, cell) in row.iter().enumerate() {
                if let Some(value) = cell {
                    worksheet
                        .write_string((row_idx + 1) as u32, col as u16, value)
                        .map_err(|e| {
                            DocSearchError::Export(format!(
                                "Failed to write row {}: {}",
                                row_idx + 1,
                                e
                            ))
                        })?;
                }
            }
        }

        Ok(workbook)
    }

    /// Write `frame` as `translated_<original_name>` and return its path
    pub fn export(&self, frame: &Frame, original_name: &str) -> DocSearchResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_dir.join(export_file_name(original_name));

        let mut workbook = Self::to_workbook(frame)?;
        workbook
            .save(&output_path)
            .map_err(|e| DocSearchError::Export(format!("Failed to save Excel file: {}", e)))?;

        tracing::info!(file = %original_name, output = %output_path.display(), "Wrote export");
        Ok(output_path)
    }
}
