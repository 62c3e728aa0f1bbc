//! Output formatting for scan outcomes.

use crate::scan::ScanOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {s}. Use 'text' or 'json'.")),
        }
    }
}

pub fn print_report(outcome: &ScanOutcome, format: OutputFormat) {
    match format {
        OutputFormat::Text => print_text(outcome),
        OutputFormat::Json => print_json(outcome),
    }
}

fn print_text(outcome: &ScanOutcome) {
    println!("\n{}", "=".repeat(70));
    println!("SCAN HISTORY");
    println!("{}", "=".repeat(70));

    for r in outcome.log.records() {
        println!(
            "  [{:<11}] {:>6.2}%  {}  ({}, {})",
            r.result.label, r.result.confidence, r.image_name, r.source, r.timestamp
        );
        println!("               {}", r.explanation);
    }

    if !outcome.skipped.is_empty() {
        println!("\nSKIPPED ({}):", outcome.skipped.len());
        for s in &outcome.skipped {
            println!("  [ERR ] {} -- {}", s.path.display(), s.reason);
        }
    }

    let summary = outcome.log.summary();
    println!("\nSUMMARY:");
    println!("  Total scans: {}", summary.total);
    println!(
        "  Clean:       {} ({:.1}%)",
        summary.clean,
        summary.clean_percent()
    );
    println!(
        "  Risky:       {} ({:.1}%)",
        summary.risky,
        summary.risky_percent()
    );
    println!("  Skipped:     {}", outcome.skipped.len());
    println!("{}", "=".repeat(70));
}

fn print_json(outcome: &ScanOutcome) {
    let output = serde_json::json!({
        "records": outcome.log.records(),
        "skipped": outcome.skipped,
        "summary": outcome.log.summary(),
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn output_format_parses() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("yaml").is_err());
    }
}
