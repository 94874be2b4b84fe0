//! A detected temporal column assignment.

use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::format::{DateFormat, TemporalType};
use crate::input::SampleTable;

/// One source column and the format it was read with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFormat {
    /// 0-based column index in the sample.
    pub index: usize,
    /// Format that parses the column.
    pub format: DateFormat,
}

impl ColumnFormat {
    pub fn new(index: usize, format: DateFormat) -> Self {
        Self { index, format }
    }
}

/// A temporal value read from one column, or from a date column and a
/// time column that together form one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateColumn {
    /// What the assignment as a whole represents.
    pub column_type: TemporalType,
    /// The column holding the value, or the date half of a pair.
    pub primary: ColumnFormat,
    /// The time half of a date + time pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<ColumnFormat>,
}

impl DateColumn {
    /// A value held in a single column.
    pub fn single(index: usize, format: DateFormat) -> Self {
        Self {
            column_type: format.temporal_type(),
            primary: ColumnFormat::new(index, format),
            secondary: None,
        }
    }

    /// A timestamp split across a date column and a time column.
    pub fn paired(date: ColumnFormat, time: ColumnFormat) -> Self {
        Self {
            column_type: TemporalType::Timestamp,
            primary: date,
            secondary: Some(time),
        }
    }

    pub fn primary_index(&self) -> usize {
        self.primary.index
    }

    pub fn secondary_index(&self) -> Option<usize> {
        self.secondary.as_ref().map(|s| s.index)
    }

    /// Every column this assignment reads.
    pub fn columns(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.primary.index).chain(self.secondary_index())
    }

    /// The instant a row holds for this assignment, if its cells parse.
    pub fn parse_row(&self, row: &[String]) -> Option<NaiveDateTime> {
        let primary_cell = SampleTable::row_cell(row, self.primary.index)?;

        match &self.secondary {
            None => parse_logged(&self.primary, primary_cell),
            Some(time) => {
                let time_cell = SampleTable::row_cell(row, time.index)?;
                let date = parse_logged(&self.primary, primary_cell)?.date();
                let time = parse_logged(time, time_cell)?.time();
                Some(date.and_time(time))
            }
        }
    }
}

fn parse_logged(column: &ColumnFormat, cell: &str) -> Option<NaiveDateTime> {
    match column.format.parse(cell) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(
                "Column {}: '{}' does not parse as {}: {}",
                column.index, cell, column.format, e
            );
            None
        }
    }
}
