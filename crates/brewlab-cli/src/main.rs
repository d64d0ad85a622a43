//! Brewlab CLI - Coffee brew correlation and goal insights
//!
//! Usage:
//!   brewlab analyze --file brews.csv                 Rank input/outcome correlations
//!   brewlab detail --file brews.csv -i X -o Y        Scatter detail for one pair
//!   brewlab goals --file brews.csv -g tds=1.38       Track goals
//!   brewlab serve --port 3000                        Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze {
            file,
            min_samples,
            limit,
        } => commands::cmd_analyze(config_path, &file, min_samples, limit, cli.json),
        Commands::Detail {
            file,
            input,
            outcome,
            min_samples,
        } => commands::cmd_detail(config_path, &file, &input, &outcome, min_samples, cli.json),
        Commands::Goals {
            file,
            goals,
            goals_file,
            no_correlate,
        } => commands::cmd_goals(
            config_path,
            &file,
            &goals,
            goals_file.as_deref(),
            !no_correlate,
            cli.json,
        ),
        Commands::Variables => commands::cmd_variables(cli.json),
        Commands::Config => commands::cmd_config(config_path, cli.json),
        Commands::Serve {
            port,
            host,
            max_records,
        } => commands::cmd_serve(config_path, &host, port, max_records).await,
    }
}
