use super::{search_frames, SearchOutcome};
use crate::frame::Frame;

/// Column searched in translated frames
pub const PROPERTY_DESCRIPTION_COLUMN: &str = "propertydescription";

/// Search the property description of every translated frame.
///
/// Read-only: repeated calls over the same frames return the same outcome.
/// A frame without the column is skipped with a warning.
pub fn search_property_description(frames: &[Frame], query: &str) -> SearchOutcome {
    let (table, warnings) = search_frames(
        frames,
        PROPERTY_DESCRIPTION_COLUMN,
        PROPERTY_DESCRIPTION_COLUMN,
        query,
    );

    SearchOutcome {
        label: "Property Description".to_string(),
        query: query.to_string(),
        table,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warning::Warning;

    fn translated(source: &str, rows: &[&str]) -> Frame {
        let mut frame = Frame::new(
            source,
            vec!["docno".to_string(), "propertydescription".to_string()],
        );
        for (i, r) in rows.iter().enumerate() {
            frame.push_row(vec![Some(format!("{}-{}", source, i)), Some(r.to_string())]);
        }
        frame
    }

    #[test]
    fn test_only_matching_file_contributes() {
        let frames = vec![
            translated("a.xlsx", &["Shop", "Flat No. 2", "flat no. 9"]),
            translated("b.xlsx", &["Agricultural land", "Shop"]),
        ];

        let outcome = search_property_description(&frames, "FLAT");
        assert!(outcome.has_results());
        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.table.rows[0].index, 0);
        assert_eq!(outcome.table.value(0, "docno"), Some("a.xlsx-1"));
        assert_eq!(outcome.table.value(1, "docno"), Some("a.xlsx-2"));
        assert_eq!(
            outcome.summary(),
            "Results for Property Description containing 'FLAT':"
        );
    }

    #[test]
    fn test_repeated_search_is_identical() {
        let frames = vec![translated("a.xlsx", &["Flat", "Row house"])];
        let first = search_property_description(&frames, "house");
        let second = search_property_description(&frames, "house");
        assert_eq!(first, second);
    }

    #[test]
    fn test_frame_without_column_is_skipped() {
        let frames = vec![
            Frame::new("notes.xlsx", vec!["remarks".to_string()]),
            translated("a.xlsx", &["Flat"]),
        ];

        let outcome = search_property_description(&frames, "flat");
        assert_eq!(outcome.table.len(), 1);
        assert_eq!(
            outcome.warnings,
            vec![Warning::MissingColumn {
                column: "propertydescription".to_string(),
                file: "notes.xlsx".to_string()
            }]
        );
    }

    #[test]
    fn test_no_frames_no_results() {
        let outcome = search_property_description(&[], "flat");
        assert!(!outcome.has_results());
        assert_eq!(
            outcome.summary(),
            "No results found for Property Description containing 'flat'."
        );
    }
}
