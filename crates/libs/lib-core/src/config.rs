//! # Application Configuration
//!
//! Configuration is loaded from environment variables once at startup,
//! validated, and then handed to the server as part of its state. Nothing
//! reads it through a global.
//!
//! ```rust,no_run
//! use lib_core::Config;
//!
//! let config = Config::from_env()?;
//! config.validate()?;
//! # Ok::<(), lib_core::AppError>(())
//! ```

use crate::error::AppError;
use lib_utils::{get_env, get_env_or, get_env_parse_or};

/// Minimum accepted length of the token signing secret.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Secret key for JWT token signing and verification
    ///
    /// **Must be at least 32 characters long.**
    pub jwt_secret: String,

    /// JWT token validity period in hours
    ///
    /// Valid range: 1-720 hours (1 hour to 30 days)
    pub jwt_expiration_hours: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `DATABASE_URL` (default `sqlite:data/huddle.db`)
    /// - `JWT_SECRET` (required)
    /// - `JWT_EXPIRATION_HOURS` (default 24)
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = get_env_or("DATABASE_URL", "sqlite:data/huddle.db");

        let jwt_secret = get_env("JWT_SECRET").map_err(|e| AppError::Config(e.to_string()))?;

        let jwt_expiration_hours = get_env_parse_or("JWT_EXPIRATION_HOURS", 24)
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration_hours,
        })
    }

    /// Validate configuration values against security rules.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            )));
        }

        if self.jwt_expiration_hours < 1 || self.jwt_expiration_hours > 720 {
            return Err(AppError::Config(
                "JWT_EXPIRATION_HOURS must be between 1 and 720 (30 days)".to_string(),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"***")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .finish()
    }
}
