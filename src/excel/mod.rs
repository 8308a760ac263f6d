//! Excel import/export
//!
//! - Import: `.xls` / `.xlsx` upload → [`Frame`](crate::frame::Frame)
//! - Export: translated frame → `translated_<name>` workbook

mod exporter;
mod importer;

pub use exporter::{export_file_name, ExcelExporter, EXPORT_PREFIX};
pub use importer::ExcelImporter;
