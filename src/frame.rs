//! In-memory tabular data
//!
//! A [`Frame`] holds the first worksheet of one uploaded spreadsheet. A
//! [`ResultTable`] is the concatenation of search matches across frames,
//! re-indexed from zero.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single cell; `None` is an empty or missing value
pub type Cell = Option<String>;

/// One spreadsheet loaded into named columns and rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Original file name the frame was loaded from
    pub source: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Rename repeated column names to `name.1`, `name.2`, ... in place.
///
/// The first occurrence keeps its name. A generated name that is already
/// taken is suffixed again, so the result never holds two equal names.
pub fn dedupe_columns(columns: &mut [String]) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for column in columns.iter_mut() {
        let mut name = column.clone();
        let mut count = counts.get(&name).copied().unwrap_or(0);
        while count > 0 {
            counts.insert(name.clone(), count + 1);
            name = format!("{}.{}", name, count);
            count = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), count + 1);
        *column = name;
    }
}

impl Frame {
    /// Repeated column names are made unique with [`dedupe_columns`]
    pub fn new(source: impl Into<String>, mut columns: Vec<String>) -> Self {
        dedupe_columns(&mut columns);
        Self {
            source: source.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the frame width
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by exact (case-sensitive) name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_columns<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().all(|n| self.column_index(n.as_ref()).is_some())
    }

    /// Lower-case every column name in place.
    ///
    /// Names that only differed by case are made unique again, e.g.
    /// `Status` and `status` become `status` and `status.1`.
    pub fn lowercase_columns(&mut self) {
        for column in &mut self.columns {
            *column = column.to_lowercase();
        }
        dedupe_columns(&mut self.columns);
    }

    /// Build a new frame holding only `columns`, in that order.
    ///
    /// Returns `None` if any requested column is absent.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Option<Frame> {
        let indices: Vec<usize> = columns
            .iter()
            .map(|c| self.column_index(c.as_ref()))
            .collect::<Option<_>>()?;

        let mut selected = Frame::new(
            self.source.clone(),
            columns.iter().map(|c| c.as_ref().to_string()).collect(),
        );
        for row in &self.rows {
            selected.push_row(indices.iter().map(|&i| row[i].clone()).collect());
        }
        Some(selected)
    }
}

/// Rows of one frame that matched a search, borrowing the frame
#[derive(Debug, Clone)]
pub struct MatchSet<'a> {
    pub columns: &'a [String],
    pub rows: Vec<&'a [Cell]>,
}

impl MatchSet<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row of a [`ResultTable`] with its position in the concatenated result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub index: usize,
    pub cells: Vec<Cell>,
}

/// Concatenated search results with a fresh contiguous index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Concatenate match sets in order.
    ///
    /// The column list is the ordered union of every set's columns, so frames
    /// with different layouts line up by name. Cells a frame has no column
    /// for are left empty. Rows are numbered from 0.
    pub fn concat<'a>(parts: impl IntoIterator<Item = MatchSet<'a>>) -> Self {
        let parts: Vec<MatchSet<'a>> = parts.into_iter().filter(|p| !p.is_empty()).collect();

        let mut columns: Vec<String> = Vec::new();
        for part in &parts {
            for column in part.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let mut rows = Vec::new();
        for part in &parts {
            let positions: Vec<Option<usize>> = columns
                .iter()
                .map(|c| part.columns.iter().position(|p| p == c))
                .collect();
            for row in &part.rows {
                let cells = positions
                    .iter()
                    .map(|pos| pos.and_then(|i| row.get(i).cloned().flatten()))
                    .collect();
                rows.push(ResultRow {
                    index: rows.len(),
                    cells,
                });
            }
        }

        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `row`, if both exist and the cell is filled
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.cells.get(col)?.as_deref()
    }
}
