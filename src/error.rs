// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Selected option index out of range for the question. Rejected before
    /// any mutation.
    InvalidAnswerIndex { selected: usize, options: usize },

    /// The identity has no backing profile document. Scoring never creates
    /// one on the fly; provisioning is explicit.
    ProfileNotFound(String),

    /// Transient persistence failure; the caller decides on retry/backoff.
    StoreUnavailable(String),

    /// Write collided with existing state (e.g. duplicate provisioning).
    StoreConflict(String),

    /// A stored document failed to decode beyond repair.
    MalformedRecord(String),

    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidAnswerIndex { selected, options } => (
                StatusCode::BAD_REQUEST,
                format!("selected index {} out of range for {} options", selected, options),
            ),
            AppError::ProfileNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("No profile for user '{}'", id))
            }
            AppError::StoreUnavailable(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable".to_string())
            }
            AppError::StoreConflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::MalformedRecord(msg) => {
                tracing::error!("Malformed record: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Malformed record".to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into the store taxonomy.
/// Unique violations become conflicts; everything else is treated as
/// transient and surfaced for retry. Allows using `?` on store queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::StoreConflict(err.to_string())
            }
            _ => AppError::StoreUnavailable(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedRecord(err.to_string())
    }
}
