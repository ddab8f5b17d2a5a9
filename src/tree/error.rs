//! Errors returned by tree operations

use thiserror::Error;

use crate::domain::ValidationError;

/// Outcome of a failed tree operation.
///
/// `NotFound`, `Validation` and `Conflict` are expected conditions the caller
/// reports back to the user; `Storage` means the database itself failed.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl TreeError {
    pub fn not_found(message: impl Into<String>) -> Self {
        TreeError::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        TreeError::Validation(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TreeError::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TreeError::Validation(_))
    }
}

impl From<ValidationError> for TreeError {
    fn from(err: ValidationError) -> Self {
        TreeError::Validation(err.0)
    }
}

pub type TreeResult<T> = Result<T, TreeError>;
