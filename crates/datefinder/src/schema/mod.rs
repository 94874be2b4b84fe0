//! Result model: detected columns and the confidence attached to them.

mod column;
mod results;

pub use column::{ColumnFormat, DateColumn};
pub use results::{Confidence, DateColumnResults, DetectionResult};
