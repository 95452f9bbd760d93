//! # Centralized Error Handling
//!
//! [`AppError`] is the single error type that crosses the service/handler
//! boundary. Each variant maps to one machine-distinguishable kind and one
//! HTTP status:
//!
//! | variant        | kind           | status |
//! |----------------|----------------|--------|
//! | `InvalidInput` | `Validation`   | 400    |
//! | `Unauthorized` | `Unauthorized` | 401    |
//! | `NotFound`     | `NotFound`     | 404    |
//! | `Conflict`     | `Conflict`     | 409    |
//! | `Internal`     | `Internal`     | 500    |
//! | `Config`       | `Internal`     | 500    |
//!
//! `Internal` and `Config` carry full detail for the server log; callers only
//! ever see a generic message for them.

use crate::dto::ApiResponse;
use crate::model::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Generic message returned for every server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing or rejected credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A write collided with a uniqueness rule.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Requested resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store, transaction or other unexpected failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "Validation",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::NotFound(_) => "NotFound",
            AppError::Conflict(_) => "Conflict",
            AppError::Config(_) | AppError::Internal(_) => "Internal",
        }
    }

    /// Get a user-facing error message.
    ///
    /// For internal errors, returns a generic message to avoid exposing implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Config(_) | AppError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        let body = ApiResponse::<()>::failure(self.kind(), self.user_message(), status.as_u16());

        (status, Json(body)).into_response()
    }
}

/// Store errors with no more specific meaning at the call site.
///
/// Call sites that know what a constraint means (e.g. a taken workspace
/// username) match on [`StoreError`] themselves before falling back to this.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { .. } => {
                AppError::Conflict("Resource already exists".to_string())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::from(err).into()
    }
}
