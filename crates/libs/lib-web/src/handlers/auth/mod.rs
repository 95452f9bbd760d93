//! # Authentication Handlers
//!
//! - `POST /api/v1/auth/register` - create an account, answer with a token
//! - `POST /api/v1/auth/login` - exchange email and password for a token
//! - `GET /api/v1/auth/profile` - the caller's account (behind the auth gate)
//!
//! Login failures never tell an unknown email apart from a wrong password.

use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};
use lib_auth::{hash_password, verify_password, Identity, TokenService};
use lib_core::dto::{ApiResponse, AuthResponse, LoginRequest, RegisterRequest, UserInfo};
use lib_core::model::store::models::{User, UserForCreate};
use lib_core::model::store::UserRepository;
use lib_core::{AppError, DbPool, StoreError};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Register handler - creates a new user account.
///
/// # Returns
///
/// * `201` with `{ token, user }` on success
/// * `400` on invalid name, email or password
/// * `409` when the email is already registered
#[instrument(skip(pool, tokens, req), fields(email = %req.email))]
pub async fn register(
    State(pool): State<DbPool>,
    State(tokens): State<Arc<TokenService>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    info!("[REGISTER] New registration request");

    req.validate().inspect_err(|e| warn!("[REGISTER] Validation failed: {}", e))?;

    let existing = UserRepository::find_by_email(&pool, &req.email)
        .await
        .map_err(|e| {
            error!("[REGISTER] Database error checking email: {}", e);
            AppError::Internal(format!("Failed to check email: {}", e))
        })?;
    if existing.is_some() {
        warn!("[REGISTER] Email already registered: {}", req.email);
        return Err(email_taken());
    }

    debug!("[REGISTER] Hashing password...");
    let password_hash = hash_password(&req.password).map_err(|e| {
        error!("[REGISTER] Password hashing failed: {}", e);
        AppError::Internal(format!("Failed to hash password: {}", e))
    })?;

    // The pre-check can race; the unique constraint on email has the final word.
    let user = UserRepository::create(
        &pool,
        UserForCreate::new(req.name.clone(), req.email.clone(), password_hash),
    )
    .await
    .map_err(|e| match e {
        StoreError::UniqueViolation { .. } => {
            warn!("[REGISTER] Email registered concurrently: {}", req.email);
            email_taken()
        }
        other => {
            error!("[REGISTER] Failed to create user: {}", other);
            AppError::Internal(format!("Failed to create user: {}", other))
        }
    })?;

    let response = auth_response(&tokens, user, "[REGISTER]")?;
    info!("[REGISTER] User registered: {}", response.user.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(response, "User registered successfully", 201)),
    ))
}

/// Login handler - authenticates with email and password.
///
/// # Returns
///
/// * `200` with `{ token, user }` on success
/// * `401` with a single generic message on unknown email or wrong password
#[instrument(skip(pool, tokens, req), fields(email = %req.email))]
pub async fn login(
    State(pool): State<DbPool>,
    State(tokens): State<Arc<TokenService>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    info!("[LOGIN] Login attempt");

    req.validate()?;

    let user = UserRepository::find_by_email(&pool, &req.email)
        .await
        .map_err(|e| {
            error!("[LOGIN] Database error looking up user: {}", e);
            AppError::Internal(format!("Failed to find user: {}", e))
        })?
        .ok_or_else(|| {
            warn!("[LOGIN] Unknown email");
            AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
        })?;

    let matches = verify_password(&req.password, &user.password_hash).map_err(|e| {
        error!("[LOGIN] Stored password digest for {} is unusable: {}", user.id, e);
        AppError::Internal(format!("Failed to verify password: {}", e))
    })?;
    if !matches {
        warn!("[LOGIN] Wrong password for user {}", user.id);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let response = auth_response(&tokens, user, "[LOGIN]")?;
    info!("[LOGIN] User logged in: {}", response.user.id);

    Ok(Json(ApiResponse::success(response, "Login successful", 200)))
}

/// Profile handler - the account behind the caller's token.
pub async fn profile(
    State(pool): State<DbPool>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<UserInfo>>, AppError> {
    let user = UserRepository::find_by_email(&pool, &identity.email)
        .await
        .map_err(|e| {
            error!("[PROFILE] Database error: {}", e);
            AppError::Internal(format!("Failed to find user: {}", e))
        })?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::success(
        UserInfo::from(user),
        "Profile retrieved successfully",
        200,
    )))
}

fn email_taken() -> AppError {
    AppError::Conflict("Email already registered".to_string())
}

fn auth_response(tokens: &TokenService, user: User, tag: &str) -> Result<AuthResponse, AppError> {
    let token = tokens.issue(&user.id, &user.email).map_err(|e| {
        error!("{} Token issuing failed: {}", tag, e);
        AppError::Internal(format!("Failed to generate token: {}", e))
    })?;

    Ok(AuthResponse {
        token,
        user: UserInfo::from(user),
    })
}

#[cfg(test)]
mod tests;
