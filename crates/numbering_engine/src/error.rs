//! Error types for the numbering engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Numbering definitions failed validation
    #[error("Numbering definition error: {0}")]
    Numbering(#[from] numbering_model::NumberingError),

    /// IO error while reading or writing settings
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be serialized
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
