//! Brewlab Core Library
//!
//! Correlation and insight analysis for a coffee brew log:
//! - Variable catalog and sample extraction from sparse brew records
//! - Pearson correlation matrix with significance and interpretation bands
//! - Ranked insights and insufficient-data warnings
//! - Goal trend tracking and "what to change / what worked" insights
//! - Scatter detail for a single input/outcome pair
//! - JSON/CSV brew log loading and analysis configuration
//!
//! Everything here is synchronous and side-effect free apart from loading
//! files, so analyses can run concurrently without coordination.

pub mod analysis;
pub mod config;
pub mod correlation;
pub mod detail;
pub mod error;
pub mod generator;
pub mod import;
pub mod models;
pub mod ranking;
pub mod stats;
pub mod trends;
pub mod variables;

pub use analysis::{AnalysisReport, Analyzer, DetailRecord, DetailReport, GoalReport};
pub use config::AnalysisConfig;
pub use correlation::{
    CorrelationMatrix, CorrelationResult, Interpretation, PairCorrelation, Strength, MIN_SAMPLES,
};
pub use detail::{PairDetail, ScatterPoint};
pub use error::{Error, Result};
pub use generator::{InsightItem, InsightKind};
pub use import::{load_records, parse_goal_pairs, parse_goals_json, RecordFormat};
pub use models::{BrewRecord, GoalTargets, VariableSample};
pub use ranking::{CorrelationInsight, DataWarning, Ranking};
pub use trends::{Improvement, MetricTrend, TrendPoint};
pub use variables::{MetricScale, Variable, VariableKind, INPUT_VARIABLES, OUTCOME_VARIABLES};
