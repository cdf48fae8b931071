//! Error types for catalog operations.

use mediator_framework::{DispatchError, Failure, FailureKind};
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The requested item does not exist.
    #[error("Item not found: {0}")]
    NotFound(String),

    /// The request was rejected by validation. The failure carries the field errors.
    #[error("Invalid item: {0}")]
    Invalid(Failure),

    /// Another item already uses the requested name.
    #[error("Duplicate item: {0}")]
    Duplicate(String),

    /// The operation was cancelled before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// Any other failure reported by a handler.
    #[error("Catalog operation failed: {0}")]
    Failed(Failure),

    /// The mediator could not carry out the call as wired.
    #[error("Mediator error: {0}")]
    Dispatch(#[from] DispatchError),
}

impl From<Failure> for CatalogError {
    fn from(failure: Failure) -> Self {
        match failure.kind() {
            FailureKind::NotFound => CatalogError::NotFound(failure.message().to_string()),
            FailureKind::Validation => CatalogError::Invalid(failure),
            FailureKind::Conflict => CatalogError::Duplicate(failure.message().to_string()),
            FailureKind::Cancelled => CatalogError::Cancelled,
            _ => CatalogError::Failed(failure),
        }
    }
}

impl CatalogError {
    /// Names of the fields rejected by validation, if any.
    pub fn invalid_fields(&self) -> Vec<&str> {
        match self {
            CatalogError::Invalid(failure) => failure
                .field_errors()
                .iter()
                .map(|e| e.field.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }
}
