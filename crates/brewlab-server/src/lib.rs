//! Brewlab Web Server
//!
//! Axum-based REST API for Brewlab brew analysis.
//!
//! The server is stateless: each request carries the brew records it wants
//! analyzed, so it holds no data between calls and needs no database.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Input validation (record count and body size limits)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use brewlab_core::Analyzer;

mod handlers;

/// Maximum request body size (10 MB)
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Default maximum number of brew records per request
pub const DEFAULT_MAX_RECORDS: usize = 10_000;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Largest record set a single request may submit
    pub max_records: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

impl ServerConfig {
    /// Parse a comma-separated origin list (e.g. from `BREWLAB_ALLOWED_ORIGINS`)
    pub fn parse_origins(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Shared application state
pub struct AppState {
    pub analyzer: Analyzer,
    pub config: ServerConfig,
}

/// Create the application router
pub fn create_router(analyzer: Analyzer, config: ServerConfig) -> Router {
    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    let state = Arc::new(AppState { analyzer, config });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/variables", get(handlers::list_variables))
        .route("/analyze", post(handlers::analyze))
        .route("/analyze/detail", post(handlers::analyze_detail))
        .route("/analyze/goals", post(handlers::analyze_goals));

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server
pub async fn serve(
    host: &str,
    port: u16,
    analyzer: Analyzer,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.allowed_origins.is_empty() {
        info!("CORS: same-origin only (set BREWLAB_ALLOWED_ORIGINS to allow others)");
    }

    let analysis = analyzer.config();
    info!(
        min_samples = analysis.min_samples,
        insight_threshold = analysis.insight_threshold,
        max_records = config.max_records,
        "Analysis settings"
    );

    let app = create_router(analyzer, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Valid request the data cannot answer (too few brews, no variation)
    pub fn unprocessable(msg: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Caller mistakes and data shortfalls are shown to the user as-is
        if let Some(core) = err.downcast_ref::<brewlab_core::Error>() {
            match core {
                brewlab_core::Error::UnknownVariable(_) | brewlab_core::Error::InvalidRequest(_) => {
                    return Self::bad_request(&core.to_string());
                }
                _ if core.is_data_shortfall() => {
                    return Self::unprocessable(&core.to_string());
                }
                _ => {}
            }
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
