//! Catalog and health handlers

use axum::Json;
use serde::Serialize;

use brewlab_core::{Variable, INPUT_VARIABLES, OUTCOME_VARIABLES};

/// Response for the variable catalog
#[derive(Debug, Serialize)]
pub struct VariablesResponse {
    pub inputs: &'static [Variable],
    pub outcomes: &'static [Variable],
}

/// Response for health checks
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/variables - Input and outcome catalogs in catalog order
pub async fn list_variables() -> Json<VariablesResponse> {
    Json(VariablesResponse {
        inputs: INPUT_VARIABLES,
        outcomes: OUTCOME_VARIABLES,
    })
}

/// GET /api/health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
