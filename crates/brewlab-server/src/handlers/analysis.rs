//! Analysis handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{AppError, AppState};
use brewlab_core::{AnalysisReport, BrewRecord, DetailReport, GoalReport, GoalTargets};

/// Request body for the correlation matrix
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub records: Vec<BrewRecord>,
    /// Override of the minimum paired records (at least 3)
    #[serde(default)]
    pub min_samples: Option<usize>,
}

/// Request body for one pair in detail
#[derive(Debug, Deserialize)]
pub struct DetailRequest {
    pub records: Vec<BrewRecord>,
    #[serde(alias = "input")]
    pub input_variable: String,
    #[serde(alias = "outcome")]
    pub outcome_variable: String,
    #[serde(default)]
    pub min_samples: Option<usize>,
}

/// Request body for goal progress
#[derive(Debug, Deserialize)]
pub struct GoalsRequest {
    pub records: Vec<BrewRecord>,
    pub goals: GoalTargets,
    /// Name the most correlated input in change insights (default true)
    #[serde(default = "default_correlate")]
    pub correlate: bool,
}

fn default_correlate() -> bool {
    true
}

fn check_record_limit(state: &AppState, records: &[BrewRecord]) -> Result<(), AppError> {
    if records.len() > state.config.max_records {
        return Err(AppError::bad_request(&format!(
            "Too many records: {} (max {})",
            records.len(),
            state.config.max_records
        )));
    }
    Ok(())
}

/// POST /api/analyze - Correlation matrix with ranked insights and warnings
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    check_record_limit(&state, &request.records)?;

    let report = state
        .analyzer
        .analyze(&request.records, request.min_samples)?;

    Ok(Json(report))
}

/// POST /api/analyze/detail - Scatter data for one input/outcome pair
///
/// Too few shared brews or a constant variable is a 422 with a message
/// meant for the user; an unknown variable name is a 400.
pub async fn analyze_detail(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DetailRequest>,
) -> Result<Json<DetailReport>, AppError> {
    check_record_limit(&state, &request.records)?;

    let report = state.analyzer.detail(
        &request.records,
        &request.input_variable,
        &request.outcome_variable,
        request.min_samples,
    )?;

    Ok(Json(report))
}

/// POST /api/analyze/goals - Goal trends with change/worked insights
pub async fn analyze_goals(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GoalsRequest>,
) -> Result<Json<GoalReport>, AppError> {
    check_record_limit(&state, &request.records)?;

    let report = state
        .analyzer
        .goals(&request.records, &request.goals, request.correlate)?;

    Ok(Json(report))
}
