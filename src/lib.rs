//! Todo Service - a task-list HTTP service backed by a document store
//!
//! Todos are flat JSON documents addressed by a sequential integer id that
//! the service assigns on create. The crate is layered bottom-up:
//!
//! - [`types`]: the todo record and the document model it is stored as
//! - [`storage`]: the document store contract, the in-memory backend, id
//!   allocation and the todo collection adapter
//! - [`service`]: error mapping, logging and metrics around the adapter
//! - [`api`]: the axum router and handlers
#![warn(missing_docs)]

// Core foundational modules
pub mod core;
pub mod types;

// Main functional modules
pub mod api;
pub mod service;
pub mod storage;
pub mod system;

// Re-export commonly used items for convenience
pub use crate::core::{Config, Error, Result};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
