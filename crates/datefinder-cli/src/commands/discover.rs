//! Discover command - list every format that parses each column.

use colored::Colorize;
use datefinder::{DateTimeFinder, DetectionMode, FinderConfig};

use super::{column_label, load_catalog, load_sample};
use crate::cli::SampleArgs;

pub fn run(args: SampleArgs, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(args.catalog.as_ref())?;
    let sample = load_sample(&args)?;
    let config = FinderConfig::default().with_mode(DetectionMode::FormatDiscovery);
    let discovered = DateTimeFinder::with_config(config)
        .with_catalog(catalog)
        .discover_formats(&sample);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&discovered)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows sampled)",
        "Discovering formats in".cyan().bold(),
        args.file.display().to_string().white(),
        sample.row_count()
    );
    println!();

    if discovered.is_empty() {
        println!("{}", "No catalog format parses any column.".yellow());
        return Ok(());
    }

    for column in &discovered {
        println!("{}", column_label(&sample, column.index).yellow().bold());
        for found in &column.formats {
            let score = format!("{:>3}%", found.parse_score);
            let score = if found.parse_score >= 80 {
                score.green()
            } else if found.parse_score >= 50 {
                score.yellow()
            } else {
                score.red()
            };
            println!(
                "  {} {:10} {}",
                score,
                found.format.temporal_type(),
                found.format.to_string().cyan()
            );
        }
        println!();
    }

    Ok(())
}
