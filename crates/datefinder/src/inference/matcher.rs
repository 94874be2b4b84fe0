//! Regex pre-filtering of sample cells against the format catalog.

use std::collections::{BTreeMap, HashSet};

use log::trace;

use super::candidate::PotentialColumn;
use crate::format::{FormatCatalog, FormatFilter};
use crate::input::SampleTable;

/// Scans sample cells against every catalog format and scores the matches.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    /// Also scan ambiguous day-before-month formats.
    discovery: bool,
}

impl PatternMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matcher for format-discovery runs, which keep ambiguous formats.
    pub fn discovery() -> Self {
        Self { discovery: true }
    }

    /// Build the candidate pool for a sample, sorted by column index.
    ///
    /// Columns in `skip` are never looked at.
    pub fn find_potential_dates(
        &self,
        sample: &SampleTable,
        catalog: &FormatCatalog,
        skip: &HashSet<usize>,
    ) -> Vec<PotentialColumn> {
        let mut columns: BTreeMap<usize, PotentialColumn> = BTreeMap::new();
        let mut non_blank: BTreeMap<usize, usize> = BTreeMap::new();
        let mut counted = false;

        for format in catalog {
            if format.is_ambiguous() && !self.discovery {
                trace!("Skipping ambiguous format {}", format);
                continue;
            }

            match format.filter() {
                FormatFilter::NoFilter => {
                    // Nothing to measure: flag every populated column of the first row.
                    if let Some(row) = sample.rows.first() {
                        for index in 0..row.len() {
                            if skip.contains(&index) || SampleTable::row_cell(row, index).is_none() {
                                continue;
                            }
                            columns
                                .entry(index)
                                .or_insert_with(|| PotentialColumn::new(index))
                                .record_forced(format);
                        }
                    }
                }
                FormatFilter::Regex(_) => {
                    for row in &sample.rows {
                        for (index, cell) in row.iter().enumerate() {
                            let cell = cell.trim();
                            if cell.is_empty() || skip.contains(&index) {
                                continue;
                            }
                            if !counted {
                                *non_blank.entry(index).or_insert(0) += 1;
                            }
                            if format.matches(cell) {
                                columns
                                    .entry(index)
                                    .or_insert_with(|| PotentialColumn::new(index))
                                    .record_hit(format);
                            }
                        }
                    }
                    counted = true;
                }
            }
        }

        // A catalog of only unfiltered formats never ran the counting pass.
        if !counted {
            for &index in columns.keys() {
                non_blank.insert(index, sample.non_blank_count(index));
            }
        }

        columns
            .into_values()
            .map(|mut column| {
                let cells = non_blank.get(&column.index).copied().unwrap_or(0);
                column.normalize(cells);
                trace!(
                    "Column {} matched {} format(s), best score {}",
                    column.index,
                    column.formats().count(),
                    column.best_score()
                );
                column
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{DateFormat, TemporalType};

    fn sample(rows: &[&[&str]]) -> SampleTable {
        SampleTable::from_strs(rows)
    }

    fn catalog(formats: Vec<DateFormat>) -> FormatCatalog {
        FormatCatalog::new(formats).unwrap()
    }

    fn iso() -> DateFormat {
        DateFormat::with_regex("iso", TemporalType::Date, "%Y-%m-%d", r"^\d{4}-\d{2}-\d{2}$").unwrap()
    }

    #[test]
    fn test_full_and_partial_scores() {
        let rows = sample(&[
            &["2020-01-01", "2020-01-01", "x"],
            &["2020-01-02", "garbage", "y"],
            &["2020-01-03", "", "z"],
        ]);
        let pool = PatternMatcher::new().find_potential_dates(&rows, &catalog(vec![iso()]), &HashSet::new());

        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].index, 0);
        assert_eq!(pool[0].format("iso").unwrap().score, 100);
        // One of two non-blank cells matched.
        assert_eq!(pool[1].format("iso").unwrap().score, 50);
    }

    #[test]
    fn test_skipped_columns_are_ignored() {
        let rows = sample(&[&["2020-01-01", "2020-01-02"]]);
        let skip: HashSet<usize> = [0].into_iter().collect();
        let pool = PatternMatcher::new().find_potential_dates(&rows, &catalog(vec![iso()]), &skip);

        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].index, 1);
    }

    #[test]
    fn test_ambiguous_formats_only_in_discovery() {
        let eu = DateFormat::with_regex("eu", TemporalType::Date, "%d/%m/%Y", r"^\d{2}/\d{2}/\d{4}$").unwrap();
        let rows = sample(&[&["25/12/2020"]]);
        let catalog = catalog(vec![eu]);

        assert!(PatternMatcher::new()
            .find_potential_dates(&rows, &catalog, &HashSet::new())
            .is_empty());
        assert_eq!(
            PatternMatcher::discovery()
                .find_potential_dates(&rows, &catalog, &HashSet::new())
                .len(),
            1
        );
    }

    #[test]
    fn test_unfiltered_format_uses_first_row_only() {
        let epoch = DateFormat::unfiltered("epoch", TemporalType::Timestamp, "%s").unwrap();
        let rows = sample(&[&["1700000000", ""], &["1700000001", "1700000002"]]);
        let pool = PatternMatcher::new().find_potential_dates(&rows, &catalog(vec![epoch]), &HashSet::new());

        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].index, 0);
        assert_eq!(pool[0].format("epoch").unwrap().score, 100);
        assert_eq!(pool[0].non_blank(), 2);
    }

    #[test]
    fn test_empty_sample_has_no_candidates() {
        let pool = PatternMatcher::new().find_potential_dates(
            &SampleTable::default(),
            &FormatCatalog::builtin(),
            &HashSet::new(),
        );
        assert!(pool.is_empty());
    }
}
