//! # Bearer Token Service
//!
//! Issues and validates HS256 JWTs carrying the caller's user id and email.
//!
//! The signing key lives in a [`TokenService`] built once from a [`TokenConfig`]
//! at startup and shared read-only afterwards. Validation needs no storage
//! lookup: a token whose signature verifies and whose expiry lies in the future
//! is trusted as-is.

use chrono::Duration;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use lib_utils::{b64u_decode, now_unix};
use serde::{Deserialize, Serialize};

/// JWT claims embedded in every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier
    #[serde(rename = "userId")]
    pub user_id: String,
    /// User email
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not verify")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("failed to encode token: {0}")]
    Encode(String),
}

/// Signing material and lifetime for issued tokens.
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    pub fn with_hours(secret: impl Into<String>, hours: i64) -> Self {
        Self::new(secret, Duration::hours(hours))
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"***")
            .field("ttl", &self.ttl)
            .finish()
    }
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `validate_at`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: config.ttl,
        }
    }

    /// Issue a token for `user_id`/`email`, valid for the configured lifetime.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<String, Error> {
        self.issue_at(user_id, email, now_unix())
    }

    /// Issue a token as if the current time were `issued_at` (Unix seconds).
    pub fn issue_at(&self, user_id: &str, email: &str, issued_at: i64) -> Result<String, Error> {
        let claims = Claims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            iat: issued_at,
            exp: issued_at + self.ttl.num_seconds(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::Encode(e.to_string()))
    }

    /// Validate a token against the current time.
    pub fn validate(&self, token: &str) -> Result<Claims, Error> {
        self.validate_at(token, now_unix())
    }

    /// Validate a token as if the current time were `now` (Unix seconds).
    ///
    /// Signature is checked before expiry, so a forged token is reported as
    /// `BadSignature` even when its claimed expiry has passed.
    pub fn validate_at(&self, token: &str, now: i64) -> Result<Claims, Error> {
        check_structure(token)?;

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => Error::BadSignature,
                ErrorKind::ExpiredSignature => Error::Expired,
                _ => Error::Malformed,
            })?
            .claims;

        if now >= claims.exp {
            return Err(Error::Expired);
        }

        Ok(claims)
    }
}

/// A compact token is three non-empty base64url segments.
fn check_structure(token: &str) -> Result<(), Error> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(Error::Malformed);
    }

    for segment in &segments {
        if segment.is_empty() || b64u_decode(segment).is_err() {
            return Err(Error::Malformed);
        }
    }

    Ok(())
}
