//! Server command implementation

use std::path::Path;

use anyhow::Result;

use brewlab_server::ServerConfig;

use super::load_analyzer;

/// Env var holding comma-separated CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "BREWLAB_ALLOWED_ORIGINS";

/// Build the server config from flags and environment
pub fn server_config(max_records: usize) -> ServerConfig {
    let origins = std::env::var(ALLOWED_ORIGINS_ENV).unwrap_or_default();
    ServerConfig {
        allowed_origins: ServerConfig::parse_origins(&origins),
        max_records,
    }
}

pub async fn cmd_serve(
    config_path: Option<&Path>,
    host: &str,
    port: u16,
    max_records: usize,
) -> Result<()> {
    let analyzer = load_analyzer(config_path)?;
    let config = server_config(max_records);

    println!("🚀 Starting Brewlab web server...");
    println!("   Listening: http://{}:{}", host, port);
    println!("   Max records per request: {}", config.max_records);
    if !config.allowed_origins.is_empty() {
        println!(
            "   Allowed origins: {} ({})",
            config.allowed_origins.join(", "),
            ALLOWED_ORIGINS_ENV
        );
    }
    println!();

    brewlab_server::serve(host, port, analyzer, config).await
}
