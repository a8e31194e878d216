//! Error types for Watchlens

use thiserror::Error;

/// Errors that can surface from the insight engine.
///
/// Per-event problems never appear here; malformed events are skipped and
/// counted in the component results. Only configuration problems abort a run,
/// and they do so before any event is processed.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
