//! # HTTP Request Handlers
//!
//! Axum handlers grouped by feature. Handlers validate input, call into the
//! store or a service, and wrap the result in the [`ApiResponse`] envelope.
//! Every failure is an [`AppError`].
//!
//! - **[`health`]**: `GET /api/v1/ping`
//! - **[`auth`]**: register, login, profile
//! - **[`workspace`]**: create, list, get, join, members
//!
//! [`ApiResponse`]: lib_core::dto::ApiResponse

pub mod auth;
pub mod health;
pub mod workspace;

use lib_core::AppError;
use tracing::info;

/// Fallback for unmatched routes.
pub async fn fallback() -> AppError {
    info!("[404 HANDLER] Unmatched route");
    AppError::NotFound("Route not found".to_string())
}
