//! Inference engine: pattern matching, candidate columns and rating.

mod candidate;
mod matcher;
mod rater;

pub use candidate::{PotentialColumn, SuccessfulFormat};
pub use matcher::PatternMatcher;
pub use rater::{DateRater, RaterConfig};

pub(crate) use candidate::percent;
