//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Brewlab - Find what moves your coffee
#[derive(Parser)]
#[command(name = "brewlab")]
#[command(about = "Correlation and goal insights for a coffee brew log", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analysis config file (defaults to the data dir override, then built-in)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Correlate every brew input with every outcome
    Analyze {
        /// Brew log export (.json or .csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Minimum brews recording both variables (at least 3)
        #[arg(long)]
        min_samples: Option<usize>,

        /// Number of insights to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show scatter detail for one input/outcome pair
    Detail {
        /// Brew log export (.json or .csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Input variable (e.g. water_temperature)
        #[arg(short, long)]
        input: String,

        /// Outcome variable (e.g. overall_score)
        #[arg(short, long)]
        outcome: String,

        /// Minimum brews recording both variables (at least 3)
        #[arg(long)]
        min_samples: Option<usize>,
    },

    /// Track progress toward outcome goals
    Goals {
        /// Brew log export (.json or .csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Goal as metric=value (repeatable), e.g. -g overall_score=9
        #[arg(short, long = "goal")]
        goals: Vec<String>,

        /// JSON file of {"metric": target} goals
        #[arg(long)]
        goals_file: Option<PathBuf>,

        /// Don't suggest inputs to adjust
        #[arg(long)]
        no_correlate: bool,
    },

    /// List the input and outcome variables
    Variables,

    /// Show the resolved analysis configuration
    Config,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Largest record set a single request may submit
        #[arg(long, default_value = "10000")]
        max_records: usize,
    },
}
