//! # Services
//!
//! Business logic that spans more than one repository call. Handlers stay thin
//! and delegate here.

pub mod workspace;

pub use workspace::WorkspaceService;
