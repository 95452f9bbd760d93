//! # Web Library
//!
//! HTTP surface of the workspace backend: routes, the auth gate and the other
//! middleware, handlers, and the workspace provisioning service.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod services;

pub use routes::app;
pub use server::{start_server, AppState, ServerConfig};

#[cfg(test)]
pub(crate) mod test_utils;
