//! Error types for the pedigree registry
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == App Error Enum ==
/// Unified error type for the registry server.
#[derive(Error, Debug)]
pub enum AppError {
    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cache invalidation pattern is not a valid regular expression
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Unique constraint violated (duplicate pedigree ID)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The next pedigree number no longer fits the fixed-width scheme
    #[error("Pedigree ID sequence exhausted: {0}")]
    SequenceExhausted(String),

    /// The underlying record store failed
    #[error("Store error: {0}")]
    Store(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) | AppError::InvalidPattern(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) | AppError::SequenceExhausted(_) => StatusCode::CONFLICT,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the registry server.
pub type Result<T> = std::result::Result<T, AppError>;
