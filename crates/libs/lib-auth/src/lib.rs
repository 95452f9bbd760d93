//! # Authentication Library
//!
//! Password hashing, bearer token issuance/validation and the authenticated
//! [`Identity`] handed to request handlers.

pub mod identity;
pub mod pwd;
pub mod token;

// Re-export commonly used types
pub use identity::Identity;
pub use pwd::{hash_password, verify_password};
pub use token::{Claims, TokenConfig, TokenService};
