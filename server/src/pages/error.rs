//! Page Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::auth::ErrorResponse;

/// Page operation error types.
#[derive(Debug, Error)]
pub enum PageError {
    /// Unknown event or slug. Also the surface for unauthorized writes, so
    /// non-organizers cannot probe which pages exist.
    #[error("The requested page does not exist")]
    NotFound,

    /// A page with the same slug (case-insensitive) already exists.
    #[error("You already have a page on that URL")]
    DuplicateSlug,

    /// Slug contains characters outside the allow-listed pattern.
    #[error("The slug may only contain letters, numbers, dots and dashes")]
    InvalidSlug,

    /// Request validation error.
    #[error("{0}")]
    Validation(String),

    /// Database error.
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    /// Internal server error.
    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::NotFound => (StatusCode::NOT_FOUND, "PAGE_NOT_FOUND"),
            Self::DuplicateSlug => (StatusCode::CONFLICT, "DUPLICATE_SLUG"),
            Self::InvalidSlug => (StatusCode::BAD_REQUEST, "INVALID_SLUG"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Database(e) => {
                tracing::error!("Database error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
            Self::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type for page operations.
pub type PageResult<T> = Result<T, PageError>;
