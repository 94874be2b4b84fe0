//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Datefinder: detect date and time columns in tabular data
#[derive(Parser)]
#[command(name = "datefinder")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the start and end date/time columns of a data file
    Detect {
        #[command(flatten)]
        sample: SampleArgs,

        /// Ignore columns whose header contains this text (repeatable)
        #[arg(short, long, value_name = "NAME")]
        exclude: Vec<String>,

        /// Finder configuration file (JSON)
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report every catalog format that parses each column
    Discover {
        #[command(flatten)]
        sample: SampleArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the format catalog
    Formats {
        /// Custom format catalog (JSON) instead of the built-in one
        #[arg(long, value_name = "CATALOG")]
        catalog: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// How to read the sample from a data file.
#[derive(Args, Clone, Debug)]
pub struct SampleArgs {
    /// Path to the data file (CSV/TSV)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of data rows to sample
    #[arg(short, long, default_value = "100")]
    pub rows: usize,

    /// Custom format catalog (JSON) instead of the built-in one
    #[arg(long, value_name = "CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Treat the first row as data rather than headers
    #[arg(long)]
    pub no_header: bool,

    /// Field delimiter (detected when omitted)
    #[arg(short, long)]
    pub delimiter: Option<char>,
}
