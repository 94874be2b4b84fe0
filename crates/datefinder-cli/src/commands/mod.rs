//! CLI command implementations.

pub mod detect;
pub mod discover;
pub mod formats;

use std::error::Error;
use std::path::PathBuf;

use datefinder::{FormatCatalog, SampleTable, Sampler, SamplerConfig};

use crate::cli::SampleArgs;

/// Read the sample described by the command-line options.
pub(crate) fn load_sample(args: &SampleArgs) -> Result<SampleTable, Box<dyn Error>> {
    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }

    let delimiter = match args.delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => return Err(format!("Delimiter must be a single ASCII character, got '{}'", c).into()),
        None => None,
    };

    let config = SamplerConfig {
        delimiter,
        has_header: !args.no_header,
        max_rows: args.rows,
        ..SamplerConfig::default()
    };
    Ok(Sampler::with_config(config).sample_file(&args.file)?)
}

/// The catalog from a file, or the built-in one.
pub(crate) fn load_catalog(path: Option<&PathBuf>) -> Result<FormatCatalog, Box<dyn Error>> {
    match path {
        Some(path) => Ok(FormatCatalog::from_json_file(path)?),
        None => Ok(FormatCatalog::builtin()),
    }
}

/// Header name of a column, falling back to its position.
pub(crate) fn column_label(sample: &SampleTable, index: usize) -> String {
    match sample.header(index) {
        Some(name) => format!("{} (column {})", name, index),
        None => format!("column {}", index),
    }
}
