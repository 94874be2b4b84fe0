//! Date/time format descriptors and the catalog that orders them.

mod catalog;
mod types;

pub use catalog::FormatCatalog;
pub use types::{DateFormat, FormatFilter, TemporalType};
