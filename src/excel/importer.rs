//! Excel importer implementation - Excel (.xls / .xlsx) → Frame

use crate::error::{DocSearchError, DocSearchResult};
use crate::frame::{Cell, Frame};
use crate::upload::UploadedFile;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{Duration, NaiveDate, NaiveTime};
use std::io::Cursor;

/// Loads the first worksheet of an uploaded spreadsheet.
///
/// Row 0 is the header. Every other cell is rendered as text; empty cells
/// and cells holding Excel errors become `None`.
pub struct ExcelImporter<'a> {
    upload: &'a UploadedFile,
}

impl<'a> ExcelImporter<'a> {
    pub fn new(upload: &'a UploadedFile) -> Self {
        Self { upload }
    }

    pub fn import(&self) -> DocSearchResult<Frame> {
        let name = self.upload.name();
        if !self.upload.has_supported_extension() {
            return Err(self.workbook_error("expected an .xls or .xlsx file"));
        }

        let bytes = self.upload.read()?;
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.as_ref()))
            .map_err(|e| self.workbook_error(e))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(Ok(range)) => range,
            Some(Err(e)) => return Err(self.workbook_error(e)),
            None => return Err(self.workbook_error("workbook has no worksheets")),
        };

        let frame = Self::range_to_frame(name, &range);
        tracing::debug!(
            file = %name,
            columns = frame.width(),
            rows = frame.height(),
            "Loaded worksheet"
        );
        Ok(frame)
    }

    fn range_to_frame(name: &str, range: &Range<Data>) -> Frame {
        let mut rows = range.rows();
        // the used range may start right of column A
        let first_col = range.start().map(|(_, col)| col as usize).unwrap_or(0);

        let columns = match rows.next() {
            Some(header) => header
                .iter()
                .enumerate()
                .map(|(idx, cell)| {
                    cell_to_text(cell)
                        .unwrap_or_else(|| format!("Unnamed: {}", first_col + idx))
                })
                .collect(),
            None => Vec::new(),
        };

        let mut frame = Frame::new(name, columns);
        for row in rows {
            frame.push_row(row.iter().map(cell_to_text).collect());
        }
        frame
    }

    fn workbook_error(&self, message: impl ToString) -> DocSearchError {
        DocSearchError::Workbook {
            file: self.upload.name().to_string(),
            message: message.to_string(),
        }
    }
}

/// Render a worksheet cell as text
fn cell_to_text(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(format_number(*f)),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => Some(format_serial_date(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Integral floats are shown without a fractional part (document numbers,
/// survey numbers and amounts are stored as floats by most exporters)
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Render an Excel serial date (days since 1899-12-30, 1900 system)
fn format_serial_date(serial: f64) -> String {
    let millis = (serial * 86_400_000.0).round() as i64;
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.and_hms_opt(0, 0, 0))
        .and_then(|epoch| epoch.checked_add_signed(Duration::milliseconds(millis)))
        .map(|dt| {
            if dt.time() == NaiveTime::MIN {
                dt.date().to_string()
            } else {
                dt.to_string()
            }
        })
        .unwrap_or_else(|| format_number(serial))
}
