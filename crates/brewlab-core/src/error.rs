//! Error types for Brewlab

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Not enough data for {input} vs {outcome}: need at least {required} records with both values, found {found}")]
    InsufficientData {
        input: String,
        outcome: String,
        found: usize,
        required: usize,
    },

    #[error("No variation in {input} vs {outcome}: every brew has the same value")]
    NoVariation { input: String, outcome: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for errors caused by the data itself rather than the request
    /// (the caller should show the message, not retry or report a bug)
    pub fn is_data_shortfall(&self) -> bool {
        matches!(self, Error::InsufficientData { .. } | Error::NoVariation { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
