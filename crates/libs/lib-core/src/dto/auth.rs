//! # Authentication Data Transfer Objects
//!
//! - `POST /api/v1/auth/register` - [`RegisterRequest`] -> [`AuthResponse`]
//! - `POST /api/v1/auth/login` - [`LoginRequest`] -> [`AuthResponse`]
//! - `GET /api/v1/auth/profile` -> [`UserInfo`]

use crate::error::AppError;
use crate::model::store::models::User;
use lib_utils::{validate_email, validate_length, validate_min_length};
use serde::{Deserialize, Serialize};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_length(&self.name, 2, 50, "Name").map_err(AppError::InvalidInput)?;
        validate_email(&self.email).map_err(AppError::InvalidInput)?;
        validate_min_length(&self.password, MIN_PASSWORD_LEN, "Password")
            .map_err(AppError::InvalidInput)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email).map_err(AppError::InvalidInput)?;
        if self.password.is_empty() {
            return Err(AppError::InvalidInput("Password is required".to_string()));
        }
        Ok(())
    }
}

/// Public user data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}
