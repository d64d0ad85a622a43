//! Detail command implementation

use std::path::Path;

use anyhow::Result;

use super::{load_analyzer, load_brews, print_json, truncate};

pub fn cmd_detail(
    config_path: Option<&Path>,
    file: &Path,
    input: &str,
    outcome: &str,
    min_samples: Option<usize>,
    json: bool,
) -> Result<()> {
    let analyzer = load_analyzer(config_path)?;
    let records = load_brews(file)?;
    let report = analyzer.detail(&records, input, outcome, min_samples)?;

    if json {
        return print_json(&report);
    }

    let correlation = &report.correlation;
    println!();
    println!("📈 {} vs {}", report.input_variable, report.outcome_variable);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   r = {:+.3}   n = {}   p = {:.4}   ({})",
        correlation.r, correlation.n, correlation.p, correlation.interpretation
    );
    println!("   {}", report.insight);
    println!();
    println!(
        "   {:<12} {:<10} {:<20} {:>10} {:>10}",
        "Brew", "Date", "Label", "Input", "Outcome"
    );
    for record in &report.records {
        println!(
            "   {:<12} {:<10} {:<20} {:>10} {:>10}",
            truncate(&record.id, 12),
            record
                .date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            truncate(record.label.as_deref().unwrap_or("-"), 20),
            record.input_value,
            record.outcome_value
        );
    }

    Ok(())
}
