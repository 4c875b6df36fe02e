use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use roster_core::error::DocumentStoreError;

/// Failure surfaced at the HTTP boundary. Every variant renders as `{"detail": ...}`.
///
/// `Unavailable` and `Internal` carry the underlying cause for the log only; their
/// response detail is fixed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    WriteFailure(String),
    #[error("Store unavailable")]
    Unavailable(String),
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::WriteFailure(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn cause(&self) -> &str {
        match self {
            ApiError::NotFound(msg)
            | ApiError::Validation(msg)
            | ApiError::WriteFailure(msg)
            | ApiError::Unavailable(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl From<DocumentStoreError> for ApiError {
    fn from(err: DocumentStoreError) -> Self {
        match err {
            DocumentStoreError::InvalidId(_) => ApiError::NotFound("Student not found".into()),
            DocumentStoreError::Write(msg) => ApiError::WriteFailure(msg),
            DocumentStoreError::Unavailable(msg) => ApiError::Unavailable(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.to_string();
        if status.is_server_error() {
            error!(%status, cause = self.cause(), "request failed");
        }
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
