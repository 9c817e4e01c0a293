//! Error types for the wet-bulb engine

use thiserror::Error;

/// Errors that can occur while estimating, classifying or normalizing
#[derive(Debug, Error)]
pub enum WetBulbError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No current conditions: {0}")]
    NoCurrentConditions(String),

    #[error("Malformed forecast entry: {0}")]
    MalformedForecastEntry(String),

    #[error("Failed to parse weather payload: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}
