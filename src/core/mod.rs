//! Core system types and foundations
//!
//! Configuration, error handling, logging setup and the application state
//! shared by the HTTP layer.

pub mod app_state;
pub mod config;
pub mod error;
pub mod factory;
pub mod logging;

// Re-export commonly used items
pub use app_state::AppState;
pub use config::Config;
pub use error::{Error, Result};
pub use factory::{build_app_state, create_app_state, ConfiguredAppState};
pub use logging::init_tracing;
