//! Datefinder: detects the date, time and timestamp columns of tabular data.
//!
//! Given a small sample of rows, datefinder works out which columns hold
//! temporal values, which catalog format each uses, and how they combine
//! into an "up" (start) and optional "down" (end) instant per row.
//!
//! # Pipeline
//!
//! - **Pattern matching**: cheap regex pre-filters build a pool of candidate
//!   columns and the formats that might fit them
//! - **Deciders**: strategies for one layout each (date + two times, date +
//!   time, lone timestamp, lone date, lone time) parse the sample and score it
//! - **Rating**: the deciders are tried in order and their winners are
//!   assembled into a [`DetectionResult`] with a 0-1 confidence
//!
//! # Example
//!
//! ```no_run
//! use datefinder::{DateTimeFinder, Sampler};
//!
//! let sample = Sampler::new().sample_file("events.csv").unwrap();
//! let result = DateTimeFinder::new().find_dates(&sample);
//!
//! if let Some(up) = &result.results.up_time {
//!     println!("Start column: {} ({})", up.primary_index(), up.primary.format);
//! }
//! println!("Confidence: {}", result.confidence);
//! ```

pub mod decider;
pub mod error;
pub mod format;
pub mod inference;
pub mod input;
pub mod schema;

mod finder;

pub use error::{DateFinderError, Result};
pub use finder::{DateTimeFinder, DetectionMode, DiscoveredColumn, DiscoveredFormat, FinderConfig};
pub use format::{DateFormat, FormatCatalog, FormatFilter, TemporalType};
pub use inference::RaterConfig;
pub use input::{SampleTable, Sampler, SamplerConfig};
pub use schema::{ColumnFormat, Confidence, DateColumn, DateColumnResults, DetectionResult};
