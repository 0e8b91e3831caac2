//! Error types for the event service.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error type for event service operations.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl EventError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            EventError::NotFound(_) => StatusCode::NOT_FOUND,
            EventError::BadRequest(_) => StatusCode::BAD_REQUEST,
            EventError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            EventError::Forbidden(_) => StatusCode::FORBIDDEN,
            EventError::Database(_) | EventError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            EventError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            EventError::BadRequest(msg) => ("BAD_REQUEST", msg.clone()),
            EventError::Unauthorized(msg) => ("UNAUTHORIZED", msg.clone()),
            EventError::Forbidden(msg) => ("FORBIDDEN", msg.clone()),
            EventError::Database(e) => {
                // Log the actual error but don't expose internals
                tracing::error!(error = %e, "Database error");
                ("DATABASE_ERROR", "A database error occurred".to_string())
            }
            EventError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ("INTERNAL_ERROR", "An internal error occurred".to_string())
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for event service operations.
pub type EventResult<T> = Result<T, EventError>;
