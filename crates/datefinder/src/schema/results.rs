//! Final output of a detection run.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::column::DateColumn;

/// Confidence in a detection, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    pub const NONE: Confidence = Confidence(0.0);

    /// Derive a confidence from a 0-100 score.
    pub fn from_score(score: u32) -> Self {
        Self::new(f64::from(score) / 100.0)
    }

    /// Clamp an arbitrary value into range; NaN counts as no confidence.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::NONE;
        }
        Confidence(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}

/// The start ("up") and optional end ("down") temporal columns of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateColumnResults {
    /// The primary, chronologically earlier column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_time: Option<DateColumn>,
    /// A later event, such as an end time, in a different column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_time: Option<DateColumn>,
}

impl DateColumnResults {
    pub fn is_empty(&self) -> bool {
        self.up_time.is_none() && self.down_time.is_none()
    }

    /// Every column referenced by the results.
    pub fn columns(&self) -> Vec<usize> {
        self.up_time
            .iter()
            .chain(self.down_time.iter())
            .flat_map(DateColumn::columns)
            .collect()
    }
}

/// Results plus the confidence the engine has in them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub results: DateColumnResults,
    /// Integer 0-100 score the confidence was derived from.
    pub score: u32,
    pub confidence: Confidence,
}

impl DetectionResult {
    /// Nothing usable was found.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(results: DateColumnResults, score: u32) -> Self {
        Self {
            results,
            score,
            confidence: Confidence::from_score(score),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamps() {
        assert_eq!(Confidence::from_score(0).value(), 0.0);
        assert_eq!(Confidence::from_score(75).value(), 0.75);
        assert_eq!(Confidence::from_score(250).value(), 1.0);
        assert_eq!(Confidence::new(-3.0).value(), 0.0);
        assert_eq!(Confidence::new(f64::NAN).value(), 0.0);
    }

    #[test]
    fn test_empty_result() {
        let result = DetectionResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.confidence, Confidence::NONE);
        assert!(result.results.columns().is_empty());
    }
}
