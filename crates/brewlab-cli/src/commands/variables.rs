//! Variable catalog and config display

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use brewlab_core::{Variable, INPUT_VARIABLES, OUTCOME_VARIABLES};

use super::{config_override_path, load_config, print_json};

pub fn cmd_variables(json: bool) -> Result<()> {
    if json {
        return print_json(&json!({
            "inputs": INPUT_VARIABLES,
            "outcomes": OUTCOME_VARIABLES,
        }));
    }

    println!();
    println!("Inputs:");
    for variable in INPUT_VARIABLES {
        print_variable(variable);
    }
    println!();
    println!("Outcomes:");
    for variable in OUTCOME_VARIABLES {
        print_variable(variable);
    }

    Ok(())
}

fn print_variable(variable: &Variable) {
    let unit = variable.unit.map(|u| format!(" ({})", u)).unwrap_or_default();
    println!("   {:<22} {}{}", variable.name, variable.label, unit);
}

pub fn cmd_config(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;

    let source = match config_path {
        Some(path) => path.display().to_string(),
        None => match config_override_path() {
            Some(path) if path.exists() => path.display().to_string(),
            _ => "built-in defaults".to_string(),
        },
    };

    if json {
        return print_json(&json!({
            "source": source,
            "min_samples": config.min_samples,
            "insight_threshold": config.insight_threshold,
            "tds_tolerance": config.tds_tolerance,
            "extraction_yield_tolerance": config.extraction_yield_tolerance,
        }));
    }

    println!();
    println!("⚙️  Analysis config ({})", source);
    println!("   min_samples:                {}", config.min_samples);
    println!("   insight_threshold:          {}", config.insight_threshold);
    println!("   tds_tolerance:              {}", config.tds_tolerance);
    println!(
        "   extraction_yield_tolerance: {}",
        config.extraction_yield_tolerance
    );
    if config_path.is_none() {
        if let Some(path) = config_override_path() {
            println!();
            println!("   Override file: {}", path.display());
        }
    }

    Ok(())
}
