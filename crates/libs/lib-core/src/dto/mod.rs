//! # Data Transfer Objects (DTOs)
//!
//! Request and response bodies of the REST API, plus the common response
//! envelope every endpoint answers with.

pub mod auth;
pub mod response;
pub mod workspace;

pub use auth::*;
pub use response::*;
pub use workspace::*;
