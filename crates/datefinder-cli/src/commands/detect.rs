//! Detect command - find the start and end date/time columns of a file.

use std::path::PathBuf;

use colored::Colorize;
use datefinder::{DateColumn, DateTimeFinder, FinderConfig, SampleTable};

use super::{column_label, load_catalog, load_sample};
use crate::cli::SampleArgs;

pub fn run(
    args: SampleArgs,
    exclude: Vec<String>,
    config: Option<PathBuf>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut finder_config = match &config {
        Some(path) => FinderConfig::from_json_file(path)?,
        None => FinderConfig::default(),
    };
    finder_config.excluded_columns.extend(exclude);

    let catalog = load_catalog(args.catalog.as_ref())?;
    let sample = load_sample(&args)?;
    let finder = DateTimeFinder::with_config(finder_config).with_catalog(catalog);
    let result = finder.find_dates(&sample);

    if json_output {
        let output = serde_json::json!({
            "file": args.file.display().to_string(),
            "rows_sampled": sample.row_count(),
            "headers": sample.headers,
            "result": result,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows sampled)",
        "Detecting dates in".cyan().bold(),
        args.file.display().to_string().white(),
        sample.row_count()
    );
    println!();

    if result.is_empty() {
        println!("{}", "No date or time columns found.".yellow());
        return Ok(());
    }

    if let Some(up) = &result.results.up_time {
        print_column("Up time:  ", up, &sample, verbose);
    }
    if let Some(down) = &result.results.down_time {
        print_column("Down time:", down, &sample, verbose);
    }
    println!();

    let percent = result.confidence.value() * 100.0;
    let confidence = if percent >= 80.0 {
        result.confidence.to_string().green()
    } else if percent >= 50.0 {
        result.confidence.to_string().yellow()
    } else {
        result.confidence.to_string().red()
    };
    println!("Confidence: {}", confidence);

    Ok(())
}

fn print_column(label: &str, column: &DateColumn, sample: &SampleTable, verbose: bool) {
    println!(
        "{} {} {}",
        label.yellow().bold(),
        column.column_type.to_string().white().bold(),
        column_label(sample, column.primary.index)
    );
    println!("            format {}", column.primary.format.to_string().cyan());

    if let Some(secondary) = &column.secondary {
        println!(
            "            + {} format {}",
            column_label(sample, secondary.index),
            secondary.format.to_string().cyan()
        );
    }

    if verbose {
        let parsed: Vec<String> = sample
            .rows
            .iter()
            .take(3)
            .filter_map(|row| column.parse_row(row))
            .map(|value| value.to_string())
            .collect();
        if !parsed.is_empty() {
            println!("            e.g. {}", parsed.join(", ").dimmed());
        }
    }
}
