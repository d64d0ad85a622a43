//! Shared command utilities

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use brewlab_core::{config, import, AnalysisConfig, Analyzer, BrewRecord};

/// Resolve the analysis config: explicit file, then data dir override, then built-in
pub fn load_config(config_path: Option<&Path>) -> Result<AnalysisConfig> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            AnalysisConfig::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => AnalysisConfig::load().context("Failed to load analysis config"),
    }
}

/// Build an analyzer from the resolved config
pub fn load_analyzer(config_path: Option<&Path>) -> Result<Analyzer> {
    Ok(Analyzer::new(load_config(config_path)?))
}

/// Load a brew log export
pub fn load_brews(file: &Path) -> Result<Vec<BrewRecord>> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }
    let records = import::load_records(file)
        .with_context(|| format!("Failed to load brews from {}", file.display()))?;
    if records.is_empty() {
        tracing::warn!(file = %file.display(), "No brews found");
    }
    Ok(records)
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Where the data dir override would live
pub fn config_override_path() -> Option<std::path::PathBuf> {
    config::default_config_path()
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
