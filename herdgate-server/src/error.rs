//! Request-boundary error mapping.
//!
//! Every error is caught here and converted to a response; no operation is
//! fatal to the process. Upstream failures keep their detail in the log and
//! surface to clients as a generic 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use herdgate_rtdb::RtdbError;
use herdgate_store::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(detail) => {
                error!("upstream failure: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<RtdbError> for ApiError {
    fn from(err: RtdbError) -> Self {
        match err {
            RtdbError::MissingField(_)
            | RtdbError::InvalidKind(_)
            | RtdbError::KindUndetermined => ApiError::Validation(err.to_string()),
            RtdbError::ProjectNotFound(_)
            | RtdbError::RecordNotFound(_)
            | RtdbError::NoHistory => ApiError::NotFound(err.to_string()),
            RtdbError::Upstream(detail) => ApiError::Upstream(detail),
            RtdbError::Store(inner) => inner.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}
