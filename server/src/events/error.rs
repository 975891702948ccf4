//! Error types for event lifecycle handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::auth::ErrorResponse;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found")]
    NotFound,

    #[error("Event slug already in use")]
    DuplicateSlug,

    #[error("Invalid event data: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            Self::NotFound => (StatusCode::NOT_FOUND, "EVENT_NOT_FOUND"),
            Self::DuplicateSlug => (StatusCode::CONFLICT, "DUPLICATE_SLUG"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Database(e) => {
                tracing::error!("Database error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
            }
            Self::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type EventResult<T> = Result<T, EventError>;
