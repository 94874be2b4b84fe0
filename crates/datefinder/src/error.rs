//! Error types for the datefinder library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for datefinder operations.
///
/// Detection itself never fails; these errors come from loading catalogs,
/// configuration and sample files.
#[derive(Debug, Error)]
pub enum DateFinderError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A catalog entry that cannot be used.
    #[error("Invalid format '{key}': {message}")]
    InvalidFormat { key: String, message: String },

    /// Empty file or no rows to sample.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for datefinder operations.
pub type Result<T> = std::result::Result<T, DateFinderError>;
