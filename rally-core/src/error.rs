//! Error types for the rally ecosystem.

use thiserror::Error;

/// Errors that can occur in rally operations.
#[derive(Error, Debug)]
pub enum RallyError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rally operations.
pub type RallyResult<T> = Result<T, RallyError>;
