//! Sample input: in-memory tables and the CSV sampler that fills them.

mod parser;
mod source;

pub use parser::{Sampler, SamplerConfig};
pub use source::SampleTable;
