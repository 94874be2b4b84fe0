//! Datefinder CLI - detect date and time columns in tabular data.

mod cli;
mod commands;

use std::env;
use std::sync::OnceLock;

use clap::Parser;
use cli::{Cli, Commands};
use log::LevelFilter;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging(verbose: bool) {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if verbose {
            builder.filter_module("datefinder", LevelFilter::Debug);
        } else if env::var("RUST_LOG").is_err() {
            builder.filter_module("datefinder", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Detect {
            sample,
            exclude,
            config,
            json,
        } => commands::detect::run(sample, exclude, config, json, cli.verbose),

        Commands::Discover { sample, json } => commands::discover::run(sample, json),

        Commands::Formats { catalog, json } => commands::formats::run(catalog, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
