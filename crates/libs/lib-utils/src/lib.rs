//! # Utilities Library
//!
//! Shared helpers for environment variables, base64url, time and input validation.

pub mod b64;
pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use b64::{b64u_decode, b64u_encode};
pub use envs::{get_env, get_env_or, get_env_parse_or};
pub use time::{now_unix, now_utc};
pub use validation::{validate_email, validate_http_url, validate_length, validate_min_length};
