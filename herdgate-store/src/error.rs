//! Storage error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("duplicate key: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("encryption error: {0}")]
    Encryption(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}
