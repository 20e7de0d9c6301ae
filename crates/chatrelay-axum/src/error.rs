//! Axum-specific error types and mappings.
//!
//! Maps [`RelayError`] to HTTP status codes and a JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chatrelay_core::RelayError;
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error (backend unavailable, timeouts, aborts).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<RelayError> for HttpError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::InvalidRequest(_) => HttpError::BadRequest(err.to_string()),
            RelayError::UnknownModel(_) => HttpError::NotFound(err.to_string()),
            // The remaining cases are all backend-side failures the caller
            // cannot fix by changing the request.
            RelayError::NoBackendAvailable
            | RelayError::SendTimeout
            | RelayError::ReceiveTimeout
            | RelayError::BackendNotReady => HttpError::Internal(err.to_string()),
        }
    }
}
