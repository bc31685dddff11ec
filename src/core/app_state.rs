//! Application State Management
//!
//! This module defines the central AppState shared by every HTTP handler.
//! It holds only immutable handles, so cloning it per request is cheap.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::config::Config;
use crate::service::TodoService;
use crate::storage::StorageImpl;
use crate::system::Metrics;

/// Central application state holding all services and components
pub struct AppState<S: StorageImpl> {
    /// Todo service over the configured store
    pub service: Arc<TodoService<S>>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Metrics registry shared with the service
    pub metrics: Arc<Metrics>,

    /// When the state was built, for uptime reporting
    pub started_at: Instant,
}

impl<S: StorageImpl> AppState<S> {
    /// Create a new AppState with the given components
    pub fn new(service: TodoService<S>, config: Config, metrics: Arc<Metrics>) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
            metrics,
            started_at: Instant::now(),
        }
    }

    /// Time since the state was built
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

// Manual impl: S itself need not be Clone
impl<S: StorageImpl> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            config: Arc::clone(&self.config),
            metrics: Arc::clone(&self.metrics),
            started_at: self.started_at,
        }
    }
}
