//! HTTP error handling and response types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub const MSG_COORDINATES_REQUIRED: &str = "lat og lon kreves";
pub const MSG_INVALID_COORDINATES: &str = "Ugyldige koordinater";

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable (Norwegian) message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
        }
    }
}

/// Error type for HTTP handlers.
#[derive(Debug)]
pub enum HttpError {
    /// Invalid request (validation error)
    BadRequest(String),
}

/// Malformed JSON bodies get the same error shape as every other 400.
impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            HttpError::BadRequest(msg) => {
                tracing::debug!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
        };

        (status, Json(error)).into_response()
    }
}
