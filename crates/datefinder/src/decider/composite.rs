//! Deciders for values spread across several columns.

use log::debug;

use super::single::{SingleValueDecider, best_scored};
use super::{Decider, DecisionContext, Decision, OrderTally, ScoredColumn, mean_score};
use crate::format::TemporalType;
use crate::inference::PotentialColumn;
use crate::input::SampleTable;
use crate::schema::DateColumn;

/// A date column followed by a time column, together forming one timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeDateTimeDecider;

impl Decider for CompositeDateTimeDecider {
    fn name(&self) -> &'static str {
        "composite_date_time"
    }

    fn calculate_confidence(
        &self,
        pool: &[PotentialColumn],
        sample: &SampleTable,
        ctx: &DecisionContext,
    ) -> Vec<ScoredColumn> {
        let dates = SingleValueDecider::new(TemporalType::Date).score_columns(pool, sample, ctx);
        let Some(date) = best_scored(&dates) else {
            return Vec::new();
        };

        let remaining = pool.iter().filter(|c| c.index != date.index);
        let times = SingleValueDecider::new(TemporalType::Time).score_columns(remaining, sample, ctx);
        let Some(time) = best_scored(&times) else {
            return Vec::new();
        };

        // Dates are written before the time of day.
        if time.index < date.index {
            debug!(
                "Time column {} precedes date column {}, not pairing",
                time.index, date.index
            );
            return Vec::new();
        }

        vec![date.clone(), time.clone()]
    }

    fn compile_results(&self, scored: &[ScoredColumn]) -> Vec<Decision> {
        let [date, time] = scored else {
            return Vec::new();
        };
        vec![Decision {
            column: DateColumn::paired(date.to_column_format(), time.to_column_format()),
            score: mean_score(&[date.score, time.score]),
        }]
    }
}

/// One date column and two time columns: a start and an end on the same day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneDayMultipleTimesDecider;

impl Decider for OneDayMultipleTimesDecider {
    fn name(&self) -> &'static str {
        "one_day_multiple_times"
    }

    fn calculate_confidence(
        &self,
        pool: &[PotentialColumn],
        sample: &SampleTable,
        ctx: &DecisionContext,
    ) -> Vec<ScoredColumn> {
        let dates = SingleValueDecider::new(TemporalType::Date).score_columns(pool, sample, ctx);
        let [date] = dates.as_slice() else {
            return Vec::new();
        };

        let remaining = pool.iter().filter(|c| c.index != date.index);
        let times = SingleValueDecider::new(TemporalType::Time).score_columns(remaining, sample, ctx);
        let Some((first, rest)) = times.split_first() else {
            return Vec::new();
        };

        let on_date = |time: &ScoredColumn| DateColumn::paired(date.to_column_format(), time.to_column_format());
        let first_instant = on_date(first);

        for candidate in rest {
            let tally = OrderTally::between(sample, &first_instant, &on_date(candidate), ctx.order_sample_rows);

            // A later column should hold the later event, and vice versa.
            if tally.later > tally.earlier && candidate.index > first.index {
                return vec![date.clone(), first.clone(), candidate.clone()];
            }
            if tally.earlier > tally.later && candidate.index < first.index {
                return vec![date.clone(), candidate.clone(), first.clone()];
            }
            debug!(
                "Time column {} does not order consistently against column {} ({:?})",
                candidate.index, first.index, tally
            );
        }

        Vec::new()
    }

    fn compile_results(&self, scored: &[ScoredColumn]) -> Vec<Decision> {
        let [date, up, down] = scored else {
            return Vec::new();
        };
        [up, down]
            .into_iter()
            .map(|time| Decision {
                column: DateColumn::paired(date.to_column_format(), time.to_column_format()),
                score: mean_score(&[date.score, time.score]),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::format::FormatCatalog;
    use crate::inference::PatternMatcher;

    fn ctx() -> DecisionContext {
        DecisionContext {
            passing_score: 80,
            now: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            future_horizon_years: 50,
            order_sample_rows: 10,
        }
    }

    fn pool(sample: &SampleTable) -> Vec<PotentialColumn> {
        PatternMatcher::new().find_potential_dates(sample, &FormatCatalog::builtin(), &HashSet::new())
    }

    #[test]
    fn test_composite_pairs_date_then_time() {
        let sample = SampleTable::from_strs(&[&["2020-01-02", "08:00"], &["2020-01-02", "09:00"]]);
        let decider = CompositeDateTimeDecider;
        let scored = decider.calculate_confidence(&pool(&sample), &sample, &ctx());

        assert_eq!(scored.iter().map(|s| s.index).collect::<Vec<_>>(), vec![0, 1]);

        let decisions = decider.compile_results(&scored);
        assert_eq!(decisions.len(), 1);
        let column = &decisions[0].column;
        assert_eq!(column.column_type, TemporalType::Timestamp);
        assert_eq!(column.primary_index(), 0);
        assert_eq!(column.secondary_index(), Some(1));
        assert_eq!(decisions[0].score, 100);
    }

    #[test]
    fn test_composite_rejects_time_before_date() {
        let sample = SampleTable::from_strs(&[&["08:00", "2020-01-02"], &["09:00", "2020-01-02"]]);
        assert!(CompositeDateTimeDecider
            .calculate_confidence(&pool(&sample), &sample, &ctx())
            .is_empty());
    }

    #[test]
    fn test_triple_orders_start_and_end() {
        let sample = SampleTable::from_strs(&[
            &["2020-01-02", "08:00", "17:00"],
            &["2020-01-03", "09:15", "18:30"],
            &["2020-01-04", "07:45", "16:00"],
        ]);
        let decider = OneDayMultipleTimesDecider;
        let scored = decider.calculate_confidence(&pool(&sample), &sample, &ctx());

        assert_eq!(scored.iter().map(|s| s.index).collect::<Vec<_>>(), vec![0, 1, 2]);

        let decisions = decider.compile_results(&scored);
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].column.primary_index(), 0);
        assert_eq!(decisions[0].column.secondary_index(), Some(1));
        assert_eq!(decisions[1].column.primary_index(), 0);
        assert_eq!(decisions[1].column.secondary_index(), Some(2));
        assert_eq!(decisions[0].column.primary, decisions[1].column.primary);
    }

    #[test]
    fn test_triple_skips_inconsistent_column_order() {
        // The end time sits in an earlier column than the start time.
        let sample = SampleTable::from_strs(&[
            &["2020-01-02", "08:00", "07:00"],
            &["2020-01-03", "09:00", "08:00"],
        ]);
        assert!(OneDayMultipleTimesDecider
            .calculate_confidence(&pool(&sample), &sample, &ctx())
            .is_empty());
    }

    #[test]
    fn test_triple_needs_exactly_one_date() {
        let sample = SampleTable::from_strs(&[
            &["2020-01-02", "2020-01-05", "08:00", "17:00"],
            &["2020-01-03", "2020-01-06", "09:00", "18:00"],
        ]);
        assert!(OneDayMultipleTimesDecider
            .calculate_confidence(&pool(&sample), &sample, &ctx())
            .is_empty());
    }

    #[test]
    fn test_triple_needs_two_times() {
        let sample = SampleTable::from_strs(&[&["2020-01-02", "08:00"], &["2020-01-03", "09:00"]]);
        assert!(OneDayMultipleTimesDecider
            .calculate_confidence(&pool(&sample), &sample, &ctx())
            .is_empty());
    }
}
