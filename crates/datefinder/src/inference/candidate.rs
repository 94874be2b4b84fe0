//! Candidate columns produced by the pattern matcher.

use indexmap::IndexMap;
use serde::Serialize;

use crate::format::{DateFormat, TemporalType};

/// A format that matched at least one cell of a column.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessfulFormat {
    pub format: DateFormat,
    /// Cells that passed the format's pre-filter.
    pub hits: usize,
    /// Share of non-blank cells that matched, 0-100.
    pub score: u32,
    /// Unfiltered formats are not measured, only flagged for parsing.
    #[serde(skip)]
    forced: bool,
}

impl SuccessfulFormat {
    fn new(format: DateFormat, forced: bool) -> Self {
        Self {
            format,
            hits: 0,
            score: 0,
            forced,
        }
    }
}

/// A column that matched at least one catalog format.
#[derive(Debug, Clone, Serialize)]
pub struct PotentialColumn {
    /// 0-based column index, stable for the run.
    pub index: usize,
    /// Matched formats keyed by format key, in catalog order.
    formats: IndexMap<String, SuccessfulFormat>,
    /// Non-blank cells seen in this column.
    non_blank: usize,
    /// Highest score per temporal type, filled in by `normalize`.
    #[serde(skip)]
    best: [u32; 3],
}

impl PotentialColumn {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            formats: IndexMap::new(),
            non_blank: 0,
            best: [0; 3],
        }
    }

    /// Count one pre-filter match for a format.
    pub(crate) fn record_hit(&mut self, format: &DateFormat) {
        self.formats
            .entry(format.key().to_string())
            .or_insert_with(|| SuccessfulFormat::new(format.clone(), false))
            .hits += 1;
    }

    /// Flag an unfiltered format so the deciders try it.
    pub(crate) fn record_forced(&mut self, format: &DateFormat) {
        self.formats
            .entry(format.key().to_string())
            .or_insert_with(|| SuccessfulFormat::new(format.clone(), true));
    }

    /// Turn hit counts into 0-100 scores against the column's non-blank cells.
    pub(crate) fn normalize(&mut self, non_blank: usize) {
        self.non_blank = non_blank;
        self.best = [0; 3];

        for entry in self.formats.values_mut() {
            entry.score = if non_blank == 0 {
                0
            } else if entry.forced {
                100
            } else {
                percent(entry.hits, non_blank)
            };

            let slot = &mut self.best[entry.format.temporal_type().ordinal()];
            *slot = (*slot).max(entry.score);
        }
    }

    pub fn non_blank(&self) -> usize {
        self.non_blank
    }

    /// Best score of any format on this column.
    pub fn best_score(&self) -> u32 {
        self.best.iter().copied().max().unwrap_or(0)
    }

    /// Best score among formats of one type.
    pub fn best_score_for(&self, temporal_type: TemporalType) -> u32 {
        self.best[temporal_type.ordinal()]
    }

    /// Formats of a type that share the best score, in catalog order.
    pub fn most_successful(&self, temporal_type: TemporalType) -> impl Iterator<Item = &SuccessfulFormat> {
        let best = self.best_score_for(temporal_type);
        self.formats.values().filter(move |f| {
            f.format.temporal_type() == temporal_type && best > 0 && f.score == best
        })
    }

    /// Whether any format of the type matched.
    pub fn has_type(&self, temporal_type: TemporalType) -> bool {
        self.best_score_for(temporal_type) > 0
    }

    pub fn format(&self, key: &str) -> Option<&SuccessfulFormat> {
        self.formats.get(key)
    }

    pub fn formats(&self) -> impl Iterator<Item = &SuccessfulFormat> {
        self.formats.values()
    }
}

/// `round(part / whole * 100)`, with an empty whole scoring zero.
pub(crate) fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}
