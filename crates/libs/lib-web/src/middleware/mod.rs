//! # Middleware
//!
//! Axum middleware for authentication, request stamping, request logging and
//! response mapping.
//!
//! ## Modules
//!
//! - **[`mw_auth`]**: bearer-token auth gate for protected routes
//! - **[`mw_req_stamp`]**: request id and receive time
//! - **[`mw_logging`]**: one log line per request and response, headers redacted
//! - **[`mw_res_map`]**: turns framework error responses into the JSON envelope

// region: --- Modules
pub mod mw_auth;
pub mod mw_logging;
pub mod mw_req_stamp;
pub mod mw_res_map;
// endregion: --- Modules

// region: --- Re-exports
pub use mw_auth::{authenticate, extract_bearer, require_auth, AuthRejection};
pub use mw_logging::log_requests;
pub use mw_req_stamp::{stamp_req, RequestStamp};
pub use mw_res_map::map_res;
// endregion: --- Re-exports
