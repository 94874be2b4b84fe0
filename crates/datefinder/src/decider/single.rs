//! Deciders for a value held in one column.

use log::debug;

use super::{Decider, DecisionContext, Decision, ScoredColumn};
use crate::format::{DateFormat, TemporalType};
use crate::inference::{PotentialColumn, percent};
use crate::input::SampleTable;
use crate::schema::DateColumn;

/// Shared scoring for single-column deciders of one temporal type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleValueDecider {
    temporal_type: TemporalType,
}

impl SingleValueDecider {
    pub fn new(temporal_type: TemporalType) -> Self {
        Self { temporal_type }
    }

    pub fn temporal_type(&self) -> TemporalType {
        self.temporal_type
    }

    /// Score every column of the pool that qualifies, in pool order.
    pub fn score_columns<'a, I>(&self, columns: I, sample: &SampleTable, ctx: &DecisionContext) -> Vec<ScoredColumn>
    where
        I: IntoIterator<Item = &'a PotentialColumn>,
    {
        columns
            .into_iter()
            .filter_map(|column| self.score_column(column, sample, ctx))
            .collect()
    }

    /// The first of the column's best formats whose parse score passes.
    pub fn score_column(
        &self,
        column: &PotentialColumn,
        sample: &SampleTable,
        ctx: &DecisionContext,
    ) -> Option<ScoredColumn> {
        for candidate in column.most_successful(self.temporal_type) {
            let format = &candidate.format;
            let score = self.parse_score(column.index, format, sample, ctx);

            if score >= ctx.passing_score && score > 0 {
                debug!(
                    "{} column {} passes with {} at {}",
                    self.temporal_type, column.index, format, score
                );
                return Some(ScoredColumn {
                    index: column.index,
                    format: format.clone(),
                    score,
                });
            }
            debug!(
                "{} column {} fails with {} at {} (needs {})",
                self.temporal_type, column.index, format, score, ctx.passing_score
            );
        }
        None
    }

    /// Share of the column's non-blank cells that parse to a plausible value.
    ///
    /// Date-bearing formats without a year score zero.
    pub fn parse_score(&self, index: usize, format: &DateFormat, sample: &SampleTable, ctx: &DecisionContext) -> u32 {
        if self.temporal_type.has_date() && !format.has_year() {
            debug!("Format {} has no year, not usable as {}", format, self.temporal_type);
            return 0;
        }

        let latest = ctx.latest_plausible();
        let mut cells = 0;
        let mut successes = 0;

        for cell in sample.column_values(index) {
            cells += 1;
            match format.parse(cell) {
                Ok(value) if value > latest => {
                    debug!("Column {}: '{}' is implausibly far in the future", index, cell);
                }
                Ok(_) => successes += 1,
                Err(e) => {
                    debug!("Column {}: '{}' does not parse as {}: {}", index, cell, format, e);
                }
            }
        }

        percent(successes, cells)
    }

    /// The single best column; the first one wins a tie.
    pub fn compile(&self, scored: &[ScoredColumn]) -> Vec<Decision> {
        best_scored(scored)
            .map(|best| Decision {
                column: DateColumn::single(best.index, best.format.clone()),
                score: best.score,
            })
            .into_iter()
            .collect()
    }
}

/// Highest-scoring entry, keeping the earliest on ties.
pub(crate) fn best_scored(scored: &[ScoredColumn]) -> Option<&ScoredColumn> {
    scored.iter().fold(None, |best: Option<&ScoredColumn>, candidate| match best {
        Some(current) if current.score >= candidate.score => Some(current),
        _ => Some(candidate),
    })
}

macro_rules! single_value_decider {
    ($(#[$doc:meta])* $name:ident, $label:literal, $temporal_type:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl Decider for $name {
            fn name(&self) -> &'static str {
                $label
            }

            fn calculate_confidence(
                &self,
                pool: &[PotentialColumn],
                sample: &SampleTable,
                ctx: &DecisionContext,
            ) -> Vec<ScoredColumn> {
                SingleValueDecider::new($temporal_type).score_columns(pool, sample, ctx)
            }

            fn compile_results(&self, scored: &[ScoredColumn]) -> Vec<Decision> {
                SingleValueDecider::new($temporal_type).compile(scored)
            }
        }
    };
}

single_value_decider!(
    /// A single column holding both date and time.
    DateTimeDecider,
    "date_time",
    TemporalType::Timestamp
);

single_value_decider!(
    /// A single column holding calendar dates.
    DateDecider,
    "date",
    TemporalType::Date
);

single_value_decider!(
    /// A single column holding times of day.
    TimeDecider,
    "time",
    TemporalType::Time
);
