//! Substring search over frames
//!
//! Matching is always case-insensitive and literal: regex metacharacters in
//! the query match themselves. Empty cells never match.

mod document;
mod property;
pub mod schema;

pub use document::DocumentSearch;
pub use property::{search_property_description, PROPERTY_DESCRIPTION_COLUMN};
pub use schema::{normalize, Field, SearchField, UpstreamFormat};

use crate::frame::{Frame, MatchSet, ResultTable};
use crate::warning::Warning;
use serde::Serialize;

/// Case-insensitive literal containment
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Rows of `frame` whose `column` contains `query`.
///
/// `column` is compared against the lower-cased column names. A frame
/// without the column yields a [`Warning::MissingColumn`] naming
/// `column_label`.
pub fn filter_frame<'a>(
    frame: &'a Frame,
    column: &str,
    column_label: &str,
    query: &str,
) -> Result<MatchSet<'a>, Warning> {
    let column = column.to_lowercase();
    let idx = frame
        .columns
        .iter()
        .position(|c| c.to_lowercase() == column)
        .ok_or_else(|| Warning::MissingColumn {
            column: column_label.to_string(),
            file: frame.source.clone(),
        })?;

    let rows = frame
        .rows
        .iter()
        .filter(|row| match row[idx].as_deref() {
            Some(value) if !value.is_empty() => contains_ignore_case(value, query),
            _ => false,
        })
        .map(|row| row.as_slice())
        .collect();

    Ok(MatchSet {
        columns: &frame.columns,
        rows,
    })
}

/// Filter every frame and concatenate the matches in frame order
pub fn search_frames(
    frames: &[Frame],
    column: &str,
    column_label: &str,
    query: &str,
) -> (ResultTable, Vec<Warning>) {
    let mut warnings = Vec::new();
    let mut matches = Vec::new();

    for frame in frames {
        match filter_frame(frame, column, column_label, query) {
            Ok(set) => matches.push(set),
            Err(warning) => {
                tracing::warn!(file = %frame.source, column = %column, "Search column missing");
                warnings.push(warning);
            }
        }
    }

    (ResultTable::concat(matches), warnings)
}

/// Result of one search trigger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// Human label of the searched column, e.g. "Property Description"
    pub label: String,
    pub query: String,
    pub table: ResultTable,
    pub warnings: Vec<Warning>,
}

impl SearchOutcome {
    pub fn has_results(&self) -> bool {
        !self.table.is_empty()
    }

    /// Heading for a result table, or the "no results" notice
    pub fn summary(&self) -> String {
        if self.has_results() {
            format!("Results for {} containing '{}':", self.label, self.query)
        } else {
            format!(
                "No results found for {} containing '{}'.",
                self.label, self.query
            )
        }
    }
}
