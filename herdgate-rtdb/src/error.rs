//! Aggregation error taxonomy.

use thiserror::Error;

/// Result type for realtime-database operations.
pub type RtdbResult<T> = Result<T, RtdbError>;

/// Errors that can occur while aggregating across projects.
///
/// The endpoint layer maps these onto response statuses: missing/invalid
/// request material is a 400, unknown targets and an empty history are 404,
/// everything the external store does wrong is an unclassified 500.
#[derive(Debug, Error)]
pub enum RtdbError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid data type: {0}")]
    InvalidKind(String),

    #[error(
        "cannot determine data type; include \"dataType\", \"mobile\", or \"mobileNumber\""
    )]
    KindUndetermined,

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("data entry not found: {0}")]
    RecordNotFound(String),

    #[error("no history found to undo")]
    NoHistory,

    #[error("upstream store failure: {0}")]
    Upstream(String),

    #[error("store error: {0}")]
    Store(#[from] herdgate_store::StoreError),
}
