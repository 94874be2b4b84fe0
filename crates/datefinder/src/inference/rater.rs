//! Orchestrates the deciders over a candidate pool and picks the result.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

use super::candidate::{PotentialColumn, percent};
use crate::decider::{Decider, DecisionContext, Decision, OrderTally, default_deciders, mean_score};
use crate::format::TemporalType;
use crate::input::SampleTable;
use crate::schema::{DateColumnResults, DetectionResult};

/// Score thresholds and sampling limits for rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaterConfig {
    /// Parse score (0-100) a column needs before anything has been found.
    pub passing_score: u32,
    /// Lower bar once a primary column is known.
    pub secondary_passing_score: u32,
    /// Rows compared when checking which of two columns comes first.
    pub order_sample_rows: usize,
    /// Values more than this many years after "now" are misparses.
    pub future_horizon_years: u32,
}

impl Default for RaterConfig {
    fn default() -> Self {
        Self {
            passing_score: 80,
            secondary_passing_score: 50,
            order_sample_rows: 10,
            future_horizon_years: 50,
        }
    }
}

/// Runs the deciders over a candidate pool and assembles the up/down columns.
pub struct DateRater {
    config: RaterConfig,
    deciders: Vec<Box<dyn Decider>>,
    now: NaiveDateTime,
    discovery: bool,
}

impl DateRater {
    /// Create a rater with the default decider order.
    pub fn new(config: RaterConfig, now: NaiveDateTime) -> Self {
        Self {
            config,
            deciders: default_deciders(),
            now,
            discovery: false,
        }
    }

    /// Replace the decider list.
    ///
    /// A proposal naming a column that an earlier proposal already consumed
    /// is skipped, so custom deciders cannot place one column in both slots.
    pub fn with_deciders(mut self, deciders: Vec<Box<dyn Decider>>) -> Self {
        self.deciders = deciders;
        self
    }

    /// Format-discovery runs accept any successful parse and bare time columns.
    pub fn with_discovery(mut self, discovery: bool) -> Self {
        self.discovery = discovery;
        self
    }

    /// Passing score for the next invocation, depending on whether a primary is known.
    fn passing_score(&self, have_primary: bool) -> u32 {
        if self.discovery {
            1
        } else if have_primary {
            self.config.secondary_passing_score
        } else {
            self.config.passing_score
        }
    }

    fn context(&self, passing_score: u32) -> DecisionContext {
        DecisionContext {
            passing_score,
            now: self.now,
            future_horizon_years: self.config.future_horizon_years,
            order_sample_rows: self.config.order_sample_rows,
        }
    }

    /// Pick the up-time and down-time columns from a candidate pool.
    pub fn rate_and_pick(&self, mut pool: Vec<PotentialColumn>, sample: &SampleTable) -> DetectionResult {
        // Most promising first; deciders consume from the front.
        pool.sort_by(|a, b| b.best_score().cmp(&a.best_score()));

        let mut slots = Slots::default();

        for decider in &self.deciders {
            if pool.is_empty() || slots.is_full() {
                break;
            }
            'invoke: while !pool.is_empty() {
                let ctx = self.context(self.passing_score(slots.primary.is_some()));
                let scored = decider.calculate_confidence(&pool, sample, &ctx);
                let decisions = decider.compile_results(&scored);
                if decisions.is_empty() {
                    break;
                }

                // Decisions in one batch may share a column (the triple shares its date),
                // but never reuse one consumed by an earlier batch.
                let available: HashSet<usize> = pool.iter().map(|c| c.index).collect();

                for decision in decisions {
                    if !decision.column.columns().all(|i| available.contains(&i)) {
                        debug!(
                            "{} proposes consumed columns {:?}, skipping",
                            decider.name(),
                            decision.column.columns().collect::<Vec<_>>()
                        );
                        continue;
                    }
                    pool.retain(|c| !decision.column.columns().any(|i| i == c.index));
                    debug!(
                        "{} proposes columns {:?} at {}",
                        decider.name(),
                        decision.column.columns().collect::<Vec<_>>(),
                        decision.score
                    );
                    if !slots.promote(decision) {
                        break 'invoke;
                    }
                }
            }
        }

        self.compile(slots, sample)
    }

    fn compile(&self, slots: Slots, sample: &SampleTable) -> DetectionResult {
        let Some(primary) = slots.primary else {
            return DetectionResult::empty();
        };

        let mut results = DateColumnResults::default();
        let score = match slots.secondary {
            None => {
                results.up_time = Some(primary.column);
                primary.score
            }
            Some(secondary) if secondary.column.column_type == TemporalType::Time => {
                if secondary.column.primary_index() > primary.column.primary_index() {
                    let score = mean_score(&[primary.score, secondary.score]);
                    results.up_time = Some(primary.column);
                    results.down_time = Some(secondary.column);
                    score
                } else {
                    debug!(
                        "Dropping time column {} placed before column {}",
                        secondary.column.primary_index(),
                        primary.column.primary_index()
                    );
                    results.up_time = Some(primary.column);
                    primary.score
                }
            }
            Some(secondary) => {
                let tally = OrderTally::between(
                    sample,
                    &primary.column,
                    &secondary.column,
                    self.config.order_sample_rows,
                );
                let compared = tally.compared();
                let pair_score = mean_score(&[primary.score, secondary.score]);

                if tally.earlier * 2 > compared {
                    debug!("Swapping up/down columns ({:?})", tally);
                    results.up_time = Some(secondary.column);
                    results.down_time = Some(primary.column);
                    mean_score(&[pair_score, percent(tally.earlier, compared)])
                } else if tally.forward() == 0 {
                    debug!(
                        "No row orders column {} before column {}, dropping it",
                        primary.column.primary_index(),
                        secondary.column.primary_index()
                    );
                    results.up_time = Some(primary.column);
                    primary.score
                } else {
                    results.up_time = Some(primary.column);
                    results.down_time = Some(secondary.column);
                    mean_score(&[pair_score, percent(tally.forward(), compared)])
                }
            }
        };

        let bare_time = results.down_time.is_none()
            && results
                .up_time
                .as_ref()
                .is_some_and(|up| up.column_type == TemporalType::Time);
        if bare_time && !self.discovery {
            debug!("Only a bare time column was found, refusing it");
            return DetectionResult::empty();
        }

        DetectionResult::new(results, score)
    }
}

/// Primary and secondary decisions collected while rating.
#[derive(Debug, Default)]
struct Slots {
    primary: Option<Decision>,
    secondary: Option<Decision>,
}

impl Slots {
    fn is_full(&self) -> bool {
        self.primary.is_some() && self.secondary.is_some()
    }

    /// Place a decision; `false` when it fits nowhere.
    fn promote(&mut self, decision: Decision) -> bool {
        let Some(primary) = &self.primary else {
            self.primary = Some(decision);
            return true;
        };
        let Some(secondary) = &self.secondary else {
            self.secondary = Some(decision);
            return true;
        };

        if displaces(&decision, primary) {
            self.primary = Some(decision);
            true
        } else if displaces(&decision, secondary) {
            self.secondary = Some(decision);
            true
        } else {
            false
        }
    }
}

/// A challenger at least as good, further left and of the same type takes the slot.
fn displaces(challenger: &Decision, holder: &Decision) -> bool {
    challenger.score >= holder.score
        && challenger.column.primary_index() < holder.column.primary_index()
        && challenger.column.column_type == holder.column.column_type
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::decider::{DateDecider, DateTimeDecider, ScoredColumn, TimeDecider};
    use crate::format::{DateFormat, FormatCatalog};
    use crate::inference::PatternMatcher;
    use crate::schema::DateColumn;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn rate(rater: &DateRater, sample: &SampleTable) -> DetectionResult {
        let pool = PatternMatcher::new().find_potential_dates(sample, &FormatCatalog::builtin(), &HashSet::new());
        rater.rate_and_pick(pool, sample)
    }

    #[test]
    fn test_time_after_date_becomes_down_time() {
        let sample = SampleTable::from_strs(&[&["2020-01-02", "08:00"], &["2020-01-02", "09:00"]]);
        let rater = DateRater::new(RaterConfig::default(), now())
            .with_deciders(vec![Box::new(DateDecider), Box::new(TimeDecider)]);

        let result = rate(&rater, &sample);
        let up = result.results.up_time.as_ref().unwrap();
        let down = result.results.down_time.as_ref().unwrap();

        assert_eq!(up.primary_index(), 0);
        assert_eq!(up.column_type, TemporalType::Date);
        assert_eq!(down.primary_index(), 1);
        assert_eq!(down.column_type, TemporalType::Time);
        assert!(result.confidence.value() > 0.0);
    }

    #[test]
    fn test_time_before_date_is_dropped() {
        let sample = SampleTable::from_strs(&[&["08:00", "2020-01-02"], &["09:00", "2020-01-02"]]);
        let rater = DateRater::new(RaterConfig::default(), now())
            .with_deciders(vec![Box::new(DateDecider), Box::new(TimeDecider)]);

        let result = rate(&rater, &sample);
        assert_eq!(result.results.up_time.as_ref().unwrap().primary_index(), 1);
        assert!(result.results.down_time.is_none());
    }

    #[test]
    fn test_later_column_holding_earlier_values_is_swapped() {
        let sample = SampleTable::from_strs(&[
            &["2020-01-02 10:00:00", "2020-01-02 08:00:00"],
            &["2020-01-03 11:30:00", "2020-01-03 09:00:00"],
            &["2020-01-04 12:00:00", "2020-01-04 07:15:00"],
        ]);
        let rater = DateRater::new(RaterConfig::default(), now());

        let result = rate(&rater, &sample);
        assert_eq!(result.results.up_time.as_ref().unwrap().primary_index(), 1);
        assert_eq!(result.results.down_time.as_ref().unwrap().primary_index(), 0);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_in_order_timestamps_keep_their_places() {
        let sample = SampleTable::from_strs(&[
            &["2020-01-02 08:00:00", "2020-01-02 10:00:00"],
            &["2020-01-03 09:00:00", "2020-01-03 11:30:00"],
        ]);
        let result = rate(&DateRater::new(RaterConfig::default(), now()), &sample);

        assert_eq!(result.results.up_time.as_ref().unwrap().primary_index(), 0);
        assert_eq!(result.results.down_time.as_ref().unwrap().primary_index(), 1);
    }

    #[test]
    fn test_bare_time_is_refused_outside_discovery() {
        let sample = SampleTable::from_strs(&[&["08:00:00"], &["09:30:00"], &["17:45:10"]]);

        let result = rate(&DateRater::new(RaterConfig::default(), now()), &sample);
        assert!(result.is_empty());
        assert_eq!(result.confidence.value(), 0.0);

        let discovered = rate(
            &DateRater::new(RaterConfig::default(), now()).with_discovery(true),
            &sample,
        );
        assert_eq!(
            discovered.results.up_time.unwrap().column_type,
            TemporalType::Time
        );
    }

    #[test]
    fn test_secondary_uses_lower_threshold() {
        // Column 1 only parses 3 of 5 cells: too weak alone, enough as a second column.
        let sample = SampleTable::from_strs(&[
            &["2020-01-01 08:00:00", "2020-01-01 09:00:00"],
            &["2020-01-02 08:00:00", "2020-01-02 09:00:00"],
            &["2020-01-03 08:00:00", "2020-01-03 09:00:00"],
            &["2020-01-04 08:00:00", "2020-02-30 09:00:00"],
            &["2020-01-05 08:00:00", "2020-02-31 09:00:00"],
        ]);
        let rater = DateRater::new(RaterConfig::default(), now())
            .with_deciders(vec![Box::new(DateTimeDecider)]);

        let result = rate(&rater, &sample);
        assert_eq!(result.results.up_time.as_ref().unwrap().primary_index(), 0);
        assert_eq!(result.results.down_time.as_ref().unwrap().primary_index(), 1);
    }

    /// Replays canned decisions, one batch per invocation.
    struct Scripted {
        batches: RefCell<Vec<Vec<Decision>>>,
    }

    impl Decider for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn calculate_confidence(
            &self,
            _pool: &[PotentialColumn],
            _sample: &SampleTable,
            _ctx: &DecisionContext,
        ) -> Vec<ScoredColumn> {
            Vec::new()
        }

        fn compile_results(&self, _scored: &[ScoredColumn]) -> Vec<Decision> {
            let mut batches = self.batches.borrow_mut();
            if batches.is_empty() {
                Vec::new()
            } else {
                batches.remove(0)
            }
        }
    }

    fn decision(index: usize, score: u32) -> Decision {
        let format = DateFormat::unfiltered("ts", TemporalType::Timestamp, "%Y-%m-%d %H:%M").unwrap();
        Decision {
            column: DateColumn::single(index, format),
            score,
        }
    }

    fn scripted_pool(width: usize) -> Vec<PotentialColumn> {
        (0..width).map(PotentialColumn::new).collect()
    }

    #[test]
    fn test_equal_score_further_left_displaces() {
        let scripted = Scripted {
            batches: RefCell::new(vec![vec![decision(3, 90), decision(4, 90), decision(1, 90)]]),
        };
        let rater = DateRater::new(RaterConfig::default(), now())
            .with_deciders(vec![Box::new(scripted)])
            .with_discovery(true);
        let sample = SampleTable::from_strs(&[&["", "", "", "", ""]]);

        let result = rater.rate_and_pick(scripted_pool(5), &sample);
        // Column 1 took the primary slot from column 3; nothing parses, so the
        // order check drops the secondary.
        assert_eq!(result.results.up_time.unwrap().primary_index(), 1);
    }

    #[test]
    fn test_consumed_column_is_not_reused() {
        let scripted = Scripted {
            batches: RefCell::new(vec![vec![decision(2, 90)], vec![decision(2, 90), decision(4, 80)]]),
        };
        let rater = DateRater::new(RaterConfig::default(), now()).with_deciders(vec![Box::new(scripted)]);
        let cell = "2020-01-01 08:00";
        let sample = SampleTable::from_strs(&[&[cell, cell, cell, cell, cell]]);

        let result = rater.rate_and_pick(scripted_pool(5), &sample);
        assert_eq!(result.results.up_time.unwrap().primary_index(), 2);
        assert_eq!(result.results.down_time.unwrap().primary_index(), 4);
    }

    #[test]
    fn test_weaker_challenger_stops_the_decider() {
        let scripted = Scripted {
            batches: RefCell::new(vec![
                vec![decision(3, 90), decision(4, 90), decision(1, 50)],
                vec![decision(0, 100)],
            ]),
        };
        let rater = DateRater::new(RaterConfig::default(), now()).with_deciders(vec![Box::new(scripted)]);
        let sample = SampleTable::from_strs(&[&["", "", "", "", ""]]);

        let result = rater.rate_and_pick(scripted_pool(5), &sample);
        assert_eq!(result.results.up_time.unwrap().primary_index(), 3);
    }
}
