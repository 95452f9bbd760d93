//! # Model Layer

pub mod store;
