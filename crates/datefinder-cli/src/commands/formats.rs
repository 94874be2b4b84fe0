//! Formats command - print the format catalog.

use std::path::PathBuf;

use colored::Colorize;
use datefinder::TemporalType;

use super::load_catalog;

pub fn run(catalog: Option<PathBuf>, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = load_catalog(catalog.as_ref())?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    for temporal_type in TemporalType::ALL {
        println!("{}", temporal_type.to_string().yellow().bold());
        for format in catalog.of_type(temporal_type) {
            let ambiguous = if format.is_ambiguous() {
                " (ambiguous)".dimmed().to_string()
            } else {
                String::new()
            };
            println!(
                "  {} {} {}{}",
                format!("{:28}", format.key()).white(),
                format!("{:24}", format.pattern()).cyan(),
                format.filter().as_str().unwrap_or("-").dimmed(),
                ambiguous
            );
        }
        println!();
    }

    println!("{} formats", catalog.len().to_string().white().bold());
    Ok(())
}
