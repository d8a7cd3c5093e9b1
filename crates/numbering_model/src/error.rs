//! Error types for numbering definition loading

use crate::ids::{AbstractNumId, NumId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumberingError {
    #[error("Malformed definition: numbering instance {num_id} references missing abstract definition {abstract_num_id}")]
    MissingAbstract {
        num_id: NumId,
        abstract_num_id: AbstractNumId,
    },

    #[error("Malformed definition: {owner} references level {level} outside 0..8")]
    LevelOutOfRange { owner: String, level: u8 },

    #[error("Malformed definition: {0}")]
    MalformedDefinition(String),

    #[error("Invalid level template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },
}

impl NumberingError {
    /// Whether this error is one of the malformed-definition variants
    pub fn is_malformed_definition(&self) -> bool {
        matches!(
            self,
            NumberingError::MissingAbstract { .. }
                | NumberingError::LevelOutOfRange { .. }
                | NumberingError::MalformedDefinition(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NumberingError>;
