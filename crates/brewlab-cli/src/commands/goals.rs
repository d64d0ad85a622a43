//! Goals command implementation

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use brewlab_core::{import, GoalTargets, InsightKind};

use super::{load_analyzer, load_brews, print_json};

/// Merge goals from a JSON file and `metric=value` flags (flags win)
pub fn collect_goals(pairs: &[String], goals_file: Option<&Path>) -> Result<GoalTargets> {
    let mut goals = match goals_file {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read goals from {}", path.display()))?;
            import::parse_goals_json(&content)
                .with_context(|| format!("Invalid goals file {}", path.display()))?
        }
        None => GoalTargets::new(),
    };
    goals.extend(import::parse_goal_pairs(pairs)?);

    if goals.is_empty() {
        anyhow::bail!("No goals given (use -g metric=value or --goals-file)");
    }
    Ok(goals)
}

pub fn cmd_goals(
    config_path: Option<&Path>,
    file: &Path,
    pairs: &[String],
    goals_file: Option<&Path>,
    correlate: bool,
    json: bool,
) -> Result<()> {
    let goals = collect_goals(pairs, goals_file)?;
    let analyzer = load_analyzer(config_path)?;
    let records = load_brews(file)?;
    let report = analyzer.goals(&records, &goals, correlate)?;

    if json {
        return print_json(&report);
    }

    println!();
    println!("🎯 Goals");
    println!("   ─────────────────────────────────────────────────────────────");
    for trend in &report.trends {
        let status = if trend.target_met { "✅" } else { "⏳" };
        let latest = trend
            .latest()
            .map(|v| format!("{}", v))
            .unwrap_or_else(|| "no dated brews".to_string());
        println!(
            "   {} {:<22} latest {:<14} target {}",
            status,
            trend.metric,
            latest,
            trend.target.map(|t| t.to_string()).unwrap_or_default()
        );
    }

    if !report.insights.is_empty() {
        println!();
        for item in &report.insights {
            let marker = match item.kind {
                InsightKind::Change => "👉",
                InsightKind::Worked => "👍",
            };
            println!("   {} {}", marker, item.message);
        }
    }

    Ok(())
}
