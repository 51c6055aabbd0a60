//! Error types for bizscan-search
//!
//! Only input problems abort a run. Everything that goes wrong while querying
//! a source is recorded in that source's envelope instead (see
//! [`crate::models::SourceOutcome::Error`]).

use thiserror::Error;

/// Hard errors surfaced to the caller
#[derive(Debug, Error)]
pub enum SearchError {
    /// Input file lacks a mandatory column
    #[error("Input file must contain a '{0}' column")]
    MissingColumn(String),

    /// Identity failed validation (e.g. blank business name)
    #[error("Invalid business identity: {0}")]
    InvalidIdentity(String),

    /// CSV read or write failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Result type for bizscan-search operations
pub type SearchResult<T> = Result<T, SearchError>;
