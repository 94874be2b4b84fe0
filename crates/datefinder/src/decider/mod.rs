//! Deciders: strategies that score one shape of temporal layout.
//!
//! Each decider looks at the candidate pool for a specific shape (a lone
//! date column, a date column next to a time column, and so on), scores how
//! well the sample fits it, and compiles the winners into [`DateColumn`]s.
//! The rater tries them in the order of [`default_deciders`], most specific
//! shape first.

mod composite;
mod single;

use chrono::{Months, NaiveDateTime};
use serde::Serialize;

use crate::format::DateFormat;
use crate::inference::PotentialColumn;
use crate::input::SampleTable;
use crate::schema::{ColumnFormat, DateColumn};

pub use composite::{CompositeDateTimeDecider, OneDayMultipleTimesDecider};
pub use single::{DateDecider, DateTimeDecider, SingleValueDecider, TimeDecider};

/// Per-call settings threaded through every decider invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionContext {
    /// Minimum 0-100 parse score for a column to qualify.
    pub passing_score: u32,
    /// Reference time for the future-date guard.
    pub now: NaiveDateTime,
    /// Parsed values later than `now` plus this many years are rejected.
    pub future_horizon_years: u32,
    /// Rows sampled when comparing two columns chronologically.
    pub order_sample_rows: usize,
}

impl DecisionContext {
    /// Same context with a different passing score.
    pub fn with_passing_score(&self, passing_score: u32) -> Self {
        Self {
            passing_score,
            ..self.clone()
        }
    }

    /// Latest instant still considered a plausible value.
    pub fn latest_plausible(&self) -> NaiveDateTime {
        self.now
            .checked_add_months(Months::new(self.future_horizon_years.saturating_mul(12)))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

/// A pool column together with the format that parsed it and its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredColumn {
    pub index: usize,
    pub format: DateFormat,
    /// Share of non-blank cells that parsed, 0-100.
    pub score: u32,
}

impl ScoredColumn {
    pub fn to_column_format(&self) -> ColumnFormat {
        ColumnFormat::new(self.index, self.format.clone())
    }
}

/// A compiled assignment and its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub column: DateColumn,
    pub score: u32,
}

/// Strategy for one shape of temporal layout.
pub trait Decider {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Score the pool for this shape. An empty result means the shape does not fit.
    fn calculate_confidence(
        &self,
        pool: &[PotentialColumn],
        sample: &SampleTable,
        ctx: &DecisionContext,
    ) -> Vec<ScoredColumn>;

    /// Turn scored columns into final assignments, best first.
    fn compile_results(&self, scored: &[ScoredColumn]) -> Vec<Decision>;
}

/// The deciders in the order the rater tries them.
pub fn default_deciders() -> Vec<Box<dyn Decider>> {
    vec![
        Box::new(OneDayMultipleTimesDecider),
        Box::new(CompositeDateTimeDecider),
        Box::new(DateTimeDecider),
        Box::new(DateDecider),
        Box::new(TimeDecider),
    ]
}

/// How the second of two assignments relates in time to the first,
/// counted over sampled rows where both parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderTally {
    /// Rows where the second value is earlier.
    pub earlier: usize,
    /// Rows where both values are the same instant.
    pub equal: usize,
    /// Rows where the second value is later.
    pub later: usize,
}

impl OrderTally {
    /// Compare two assignments over the first `limit` rows where both parse.
    pub fn between(sample: &SampleTable, first: &DateColumn, second: &DateColumn, limit: usize) -> Self {
        let mut tally = OrderTally::default();

        let pairs = sample
            .rows
            .iter()
            .filter_map(|row| Some((first.parse_row(row)?, second.parse_row(row)?)))
            .take(limit);

        for (a, b) in pairs {
            match b.cmp(&a) {
                std::cmp::Ordering::Less => tally.earlier += 1,
                std::cmp::Ordering::Equal => tally.equal += 1,
                std::cmp::Ordering::Greater => tally.later += 1,
            }
        }

        tally
    }

    /// Rows where both values parsed.
    pub fn compared(&self) -> usize {
        self.earlier + self.equal + self.later
    }

    /// Rows where the first value is not after the second.
    pub fn forward(&self) -> usize {
        self.equal + self.later
    }
}

/// Rounded mean of 0-100 scores.
pub(crate) fn mean_score(scores: &[u32]) -> u32 {
    if scores.is_empty() {
        return 0;
    }
    let total: u64 = scores.iter().map(|&s| u64::from(s)).sum();
    (total as f64 / scores.len() as f64).round() as u32
}
