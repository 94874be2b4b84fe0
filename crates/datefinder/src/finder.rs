//! Main finder struct and public API.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::decider::{DecisionContext, SingleValueDecider};
use crate::error::{DateFinderError, Result};
use crate::format::{DateFormat, FormatCatalog};
use crate::inference::{DateRater, PatternMatcher, RaterConfig};
use crate::input::{SampleTable, Sampler};
use crate::schema::DetectionResult;

/// What a run is for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Pick the dataset's real temporal columns.
    #[default]
    Detect,
    /// Learn which catalog formats occur at all: ambiguous formats are
    /// scanned, any successful parse counts, exclusions are ignored.
    FormatDiscovery,
}

/// Configuration for a [`DateTimeFinder`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub mode: DetectionMode,
    /// Scoring thresholds.
    pub rater: RaterConfig,
    /// Case-insensitive header substrings whose columns are never considered.
    pub excluded_columns: Vec<String>,
    /// "Now" for the future-date guard (None = the local clock).
    pub reference_time: Option<NaiveDateTime>,
}

impl FinderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: DetectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_rater(mut self, rater: RaterConfig) -> Self {
        self.rater = rater;
        self
    }

    /// Exclude columns whose header contains `name`.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excluded_columns.push(name.into());
        self
    }

    pub fn with_reference_time(mut self, now: NaiveDateTime) -> Self {
        self.reference_time = Some(now);
        self
    }

    /// Load configuration from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FinderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| DateFinderError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject thresholds outside 0-100.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("passing_score", self.rater.passing_score),
            ("secondary_passing_score", self.rater.secondary_passing_score),
        ] {
            if value > 100 {
                return Err(DateFinderError::Config(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// A format that parsed at least one cell of a column during discovery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredFormat {
    pub format: DateFormat,
    /// Share of cells that passed the pre-filter, 0-100.
    pub match_score: u32,
    /// Share of cells that parsed to a plausible value, 0-100.
    pub parse_score: u32,
}

/// Formats found in one column during discovery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredColumn {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    pub formats: Vec<DiscoveredFormat>,
}

/// Finds the date/time columns of a sampled dataset.
///
/// Configuration is fixed at construction; one finder can be reused for any
/// number of samples.
#[derive(Debug, Clone)]
pub struct DateTimeFinder {
    config: FinderConfig,
    catalog: FormatCatalog,
}

impl DateTimeFinder {
    /// Finder with the built-in catalog and default configuration.
    pub fn new() -> Self {
        Self::with_config(FinderConfig::default())
    }

    pub fn with_config(config: FinderConfig) -> Self {
        Self {
            config,
            catalog: FormatCatalog::builtin(),
        }
    }

    pub fn with_catalog(mut self, catalog: FormatCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn catalog(&self) -> &FormatCatalog {
        &self.catalog
    }

    fn discovery(&self) -> bool {
        self.config.mode == DetectionMode::FormatDiscovery
    }

    fn now(&self) -> NaiveDateTime {
        self.config
            .reference_time
            .unwrap_or_else(|| Local::now().naive_local())
    }

    /// Detect the temporal columns of a sample.
    pub fn find_dates(&self, sample: &SampleTable) -> DetectionResult {
        let discovery = self.discovery();
        let skip = if discovery {
            HashSet::new()
        } else {
            self.excluded_indices(sample)
        };
        let matcher = if discovery {
            PatternMatcher::discovery()
        } else {
            PatternMatcher::new()
        };

        let pool = matcher.find_potential_dates(sample, &self.catalog, &skip);
        debug!(
            "{} candidate column(s) in {} sampled row(s)",
            pool.len(),
            sample.row_count()
        );
        if pool.is_empty() {
            return DetectionResult::empty();
        }

        let rater = DateRater::new(self.config.rater.clone(), self.now()).with_discovery(discovery);
        let result = rater.rate_and_pick(pool, sample);
        info!(
            "Detected columns {:?} with confidence {}",
            result.results.columns(),
            result.confidence
        );
        result
    }

    /// Sample a file with the default sampler and detect its temporal columns.
    pub fn find_dates_in_file(&self, path: impl AsRef<Path>) -> Result<DetectionResult> {
        let sample = Sampler::new().sample_file(path)?;
        Ok(self.find_dates(&sample))
    }

    /// List every catalog format that parses at least one cell, per column.
    ///
    /// Runs in discovery mode whatever the configured mode is.
    pub fn discover_formats(&self, sample: &SampleTable) -> Vec<DiscoveredColumn> {
        let pool = PatternMatcher::discovery().find_potential_dates(sample, &self.catalog, &HashSet::new());
        let ctx = DecisionContext {
            passing_score: 1,
            now: self.now(),
            future_horizon_years: self.config.rater.future_horizon_years,
            order_sample_rows: self.config.rater.order_sample_rows,
        };

        pool.iter()
            .filter_map(|column| {
                let formats: Vec<DiscoveredFormat> = column
                    .formats()
                    .filter_map(|candidate| {
                        let parse_score = SingleValueDecider::new(candidate.format.temporal_type())
                            .parse_score(column.index, &candidate.format, sample, &ctx);
                        (parse_score >= ctx.passing_score).then(|| DiscoveredFormat {
                            format: candidate.format.clone(),
                            match_score: candidate.score,
                            parse_score,
                        })
                    })
                    .collect();

                (!formats.is_empty()).then(|| DiscoveredColumn {
                    index: column.index,
                    header: sample.header(column.index).map(str::to_string),
                    formats,
                })
            })
            .collect()
    }

    /// Columns whose header contains an excluded name.
    fn excluded_indices(&self, sample: &SampleTable) -> HashSet<usize> {
        let Some(headers) = &sample.headers else {
            return HashSet::new();
        };
        let excluded: Vec<String> = self
            .config
            .excluded_columns
            .iter()
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        headers
            .iter()
            .enumerate()
            .filter(|(_, header)| {
                let header = header.to_lowercase();
                excluded.iter().any(|name| header.contains(name.as_str()))
            })
            .map(|(index, header)| {
                debug!("Excluding column {} ('{}')", index, header);
                index
            })
            .collect()
    }
}

impl Default for DateTimeFinder {
    fn default() -> Self {
        Self::new()
    }
}
