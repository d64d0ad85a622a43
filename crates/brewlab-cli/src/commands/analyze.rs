//! Analyze command implementation

use std::path::Path;

use anyhow::Result;

use super::{load_analyzer, load_brews, print_json};

pub fn cmd_analyze(
    config_path: Option<&Path>,
    file: &Path,
    min_samples: Option<usize>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let analyzer = load_analyzer(config_path)?;
    let records = load_brews(file)?;
    let report = analyzer.analyze(&records, min_samples)?;

    if json {
        return print_json(&report);
    }

    let threshold = min_samples.unwrap_or(analyzer.config().min_samples);
    println!();
    println!("☕ Brew Analysis");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Brews: {}", report.record_count);
    println!("   Minimum paired brews: {}", threshold);

    println!();
    if report.insights.is_empty() {
        println!("   No correlations above |r| {:.2} yet.", analyzer.config().insight_threshold);
    } else {
        println!("🔎 Insights ({}):", report.insights.len());
        for insight in report.insights.iter().take(limit) {
            println!(
                "   {:+.2}  {:<20} → {:<22} n={:<3} p={:.3}",
                insight.r, insight.input, insight.outcome, insight.n, insight.p
            );
        }
        if report.insights.len() > limit {
            println!("   ... and {} more", report.insights.len() - limit);
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("⚠️  Needs more data ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("   {}", warning.message);
        }
    }

    Ok(())
}
