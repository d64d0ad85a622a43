//! Analysis configuration
//!
//! Thresholds for the correlation engine and goal tracking.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/brewlab/config/analysis.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::correlation::MIN_SAMPLES;
use crate::error::{Error, Result};
use crate::variables::{self, MetricScale};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analysis.toml");

/// Smallest sample threshold that still leaves a t-test degree of freedom
pub const MIN_ALLOWED_SAMPLES: usize = 3;

/// Default |r| for a correlation to count as an insight
pub const INSIGHT_THRESHOLD: f64 = 0.3;

/// Thresholds used by an analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Minimum paired records for a correlation
    pub min_samples: usize,
    /// Minimum |r| for a correlation to be reported as an insight
    pub insight_threshold: f64,
    /// Goal tolerance for TDS (percentage points)
    pub tds_tolerance: f64,
    /// Goal tolerance for extraction yield (percentage points)
    pub extraction_yield_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_samples: MIN_SAMPLES,
            insight_threshold: INSIGHT_THRESHOLD,
            tds_tolerance: 0.02,
            extraction_yield_tolerance: 0.5,
        }
    }
}

impl AnalysisConfig {
    /// Load the override from the data dir, or the embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path (embedded defaults if it does not exist)
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Copy with a request-level sample threshold applied
    pub fn with_min_samples(&self, min_samples: Option<usize>) -> Result<Self> {
        let mut config = self.clone();
        if let Some(min_samples) = min_samples {
            if min_samples < MIN_ALLOWED_SAMPLES {
                return Err(Error::InvalidRequest(format!(
                    "min_samples must be at least {}, got {}",
                    MIN_ALLOWED_SAMPLES, min_samples
                )));
            }
            config.min_samples = min_samples;
        }
        Ok(config)
    }

    /// Goal tolerance for a metric, `None` for scale metrics
    pub fn tolerance_for(&self, metric: &str) -> Option<f64> {
        let variable = variables::lookup(metric).ok()?;
        if variable.scale != Some(MetricScale::Continuous) {
            return None;
        }
        match metric {
            "tds" => Some(self.tds_tolerance),
            "extraction_yield" => Some(self.extraction_yield_tolerance),
            _ => Some(0.0),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.min_samples < MIN_ALLOWED_SAMPLES {
            return Err(Error::Config(format!(
                "min_samples must be at least {}",
                MIN_ALLOWED_SAMPLES
            )));
        }
        if !(0.0..=1.0).contains(&self.insight_threshold) {
            return Err(Error::Config(
                "insight_threshold must be between 0 and 1".to_string(),
            ));
        }
        if !(self.tds_tolerance >= 0.0 && self.extraction_yield_tolerance >= 0.0) {
            return Err(Error::Config("tolerances must not be negative".to_string()));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("brewlab").join("config").join("analysis.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<AnalysisConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(ref path) if path.exists() => {
            tracing::debug!(path = %path.display(), "Loading analysis config override");
            fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    correlation: Option<RawCorrelation>,
    goals: Option<RawGoals>,
}

#[derive(Debug, Deserialize)]
struct RawCorrelation {
    min_samples: Option<usize>,
    insight_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawGoals {
    tds_tolerance: Option<f64>,
    extraction_yield_tolerance: Option<f64>,
}

fn parse_config(content: &str) -> Result<AnalysisConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalysisConfig::default();

    if let Some(correlation) = raw.correlation {
        if let Some(min_samples) = correlation.min_samples {
            config.min_samples = min_samples;
        }
        if let Some(threshold) = correlation.insight_threshold {
            config.insight_threshold = threshold;
        }
    }

    if let Some(goals) = raw.goals {
        if let Some(tolerance) = goals.tds_tolerance {
            config.tds_tolerance = tolerance;
        }
        if let Some(tolerance) = goals.extraction_yield_tolerance {
            config.extraction_yield_tolerance = tolerance;
        }
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = AnalysisConfig::from_toml(
            r#"
            [goals]
            tds_tolerance = 0.05
            "#,
        )
        .unwrap();
        assert_eq!(config.tds_tolerance, 0.05);
        assert_eq!(config.min_samples, MIN_SAMPLES);
        assert_eq!(config.extraction_yield_tolerance, 0.5);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(
            AnalysisConfig::from_toml("").unwrap(),
            AnalysisConfig::default()
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let low = AnalysisConfig::from_toml("[correlation]\nmin_samples = 2\n");
        assert!(matches!(low, Err(Error::Config(_))));

        let threshold = AnalysisConfig::from_toml("[correlation]\ninsight_threshold = 1.5\n");
        assert!(matches!(threshold, Err(Error::Config(_))));

        let tolerance = AnalysisConfig::from_toml("[goals]\ntds_tolerance = -0.1\n");
        assert!(matches!(tolerance, Err(Error::Config(_))));

        let garbage = AnalysisConfig::from_toml("not = [toml");
        assert!(matches!(garbage, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.toml");
        fs::write(&path, "[correlation]\nmin_samples = 8\n").unwrap();

        let config = AnalysisConfig::load_from(&path).unwrap();
        assert_eq!(config.min_samples, 8);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_with_min_samples() {
        let config = AnalysisConfig::default();
        assert_eq!(config.with_min_samples(None).unwrap().min_samples, 5);
        assert_eq!(config.with_min_samples(Some(10)).unwrap().min_samples, 10);
        assert!(matches!(
            config.with_min_samples(Some(2)),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_tolerance_for() {
        let config = AnalysisConfig::default();
        assert_eq!(config.tolerance_for("tds"), Some(0.02));
        assert_eq!(config.tolerance_for("extraction_yield"), Some(0.5));
        assert_eq!(config.tolerance_for("overall_score"), None);
        assert_eq!(config.tolerance_for("altitude"), None);
    }
}
