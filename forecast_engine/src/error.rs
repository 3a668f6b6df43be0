//! Error types for the forecast_engine crate

use thiserror::Error;

/// Custom error types for the forecast_engine crate
#[derive(Debug, Error)]
pub enum EngineError {
    /// Error from invalid caller-supplied parameters
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Not enough observed history to seed the model window
    #[error("Insufficient history: need at least {required} observations, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// Error raised during model evaluation
    #[error("Model error: {0}")]
    ModelError(String),

    /// Error from loading or validating a persisted artifact
    #[error("Artifact error: {0}")]
    ArtifactError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, EngineError>;

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::ArtifactError(err.to_string())
    }
}
