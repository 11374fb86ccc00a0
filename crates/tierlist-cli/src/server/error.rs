//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tierlist::TierlistError;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from client.
    BadRequest(String),
    /// A file failed the upload checks.
    UploadRejected { file: String, message: String },
    /// Internal server error.
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message, file) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::UploadRejected { file, message } => {
                (StatusCode::BAD_REQUEST, "upload_rejected", message, Some(file))
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg, None)
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
                file,
            }),
        )
            .into_response()
    }
}

impl From<TierlistError> for ApiError {
    fn from(err: TierlistError) -> Self {
        match err {
            TierlistError::UploadRejected { file, reason } => ApiError::UploadRejected {
                file,
                message: reason,
            },
            TierlistError::InvalidTier(_) | TierlistError::Config(_) => {
                ApiError::BadRequest(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::UploadRejected { file, message } => {
                write!(f, "Upload rejected for '{}': {}", file, message)
            }
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
