//! In-memory sample of tabular data.

use serde::{Deserialize, Serialize};

/// A sample of rows from a delimited dataset.
///
/// Rows may be ragged; any cell past the end of a row reads as blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleTable {
    /// Column headers, when the source had a header row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl SampleTable {
    /// Create a sample without headers.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: None,
            rows,
        }
    }

    /// Create a sample with a header row.
    pub fn with_headers(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: Some(headers),
            rows,
        }
    }

    /// Build a sample from string slices, mostly useful in tests.
    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    /// Attach headers to an existing sample.
    pub fn headed(mut self, headers: &[&str]) -> Self {
        self.headers = Some(headers.iter().map(|h| h.to_string()).collect());
        self
    }

    /// Number of sampled rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row or header, whichever is larger.
    pub fn column_count(&self) -> usize {
        let widest_row = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let header_len = self.headers.as_ref().map_or(0, Vec::len);
        widest_row.max(header_len)
    }

    /// Whether there is nothing to look at.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a trimmed cell, or `None` when the cell is missing or blank.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| Self::row_cell(r, col))
    }

    /// Trimmed, non-blank cell from a single row.
    pub fn row_cell(row: &[String], col: usize) -> Option<&str> {
        row.get(col)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Non-blank values of a column, in row order.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(move |row| Self::row_cell(row, index))
    }

    /// Count of non-blank cells in a column.
    pub fn non_blank_count(&self, index: usize) -> usize {
        self.column_values(index).count()
    }

    /// Header name of a column, if known.
    pub fn header(&self, index: usize) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|h| h.get(index))
            .map(|s| s.as_str())
    }
}
