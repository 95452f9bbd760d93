//! # Core Library
//!
//! Configuration, the application error type, DTOs and the credential store
//! (users, workspaces, memberships).

pub mod config;
pub mod dto;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use model::store::{create_pool, run_migrations, DbPool, StoreError};
