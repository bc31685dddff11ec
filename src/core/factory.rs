//! Application Factory
//!
//! Builds the AppState from configuration, choosing the concrete store
//! type once so the rest of the application stays generic over it.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::core::app_state::AppState;
use crate::core::config::{Config, StorageType};
use crate::core::error::Result;
use crate::service::TodoService;
use crate::storage::{MemoryStore, StorageImpl, TodoCollection};
use crate::system::Metrics;

/// AppState with its concrete storage backend
pub enum ConfiguredAppState {
    /// In-process document store
    Memory {
        /// The application state with the memory backend
        app_state: AppState<MemoryStore>,
    },
}

impl ConfiguredAppState {
    /// Get the HTTP address from config
    pub fn http_addr(&self) -> SocketAddr {
        match self {
            ConfiguredAppState::Memory { app_state } => app_state.config.server.http_addr,
        }
    }
}

/// Create AppState based on configuration
pub fn create_app_state(config: Config) -> Result<ConfiguredAppState> {
    info!(
        "Creating AppState with storage type {:?}, target {}, namespace {}",
        config.store.storage_type,
        config.store.target(),
        config.store.namespace()
    );

    match config.store.storage_type {
        StorageType::Memory => {
            let app_state = build_app_state(MemoryStore::new(), config)?;
            info!("AppState created with MemoryStore");
            Ok(ConfiguredAppState::Memory { app_state })
        }
    }
}

/// Wire a store into a service and AppState according to `config`
pub fn build_app_state<S: StorageImpl>(store: S, config: Config) -> Result<AppState<S>> {
    let metrics = Arc::new(Metrics::new()?);
    let todos = TodoCollection::new(
        Arc::new(store),
        config.store.namespace(),
        config.store.id_allocation,
    );
    let service = TodoService::new(todos, Arc::clone(&metrics));
    Ok(AppState::new(service, config, metrics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::IdAllocation;

    #[test]
    fn test_memory_app_state_creation() {
        let mut config = Config::default();
        config.server.http_addr = "127.0.0.1:3999".parse().unwrap();
        config.store.id_allocation = IdAllocation::Scan;

        let configured = create_app_state(config).unwrap();
        assert_eq!(configured.http_addr(), "127.0.0.1:3999".parse().unwrap());

        let ConfiguredAppState::Memory { app_state } = configured;
        let todos = app_state.service.collection();
        assert_eq!(todos.allocation(), IdAllocation::Scan);
        assert_eq!(todos.namespace().collection, "todo_list_collection");
        assert_eq!(todos.store().namespace_count(), 0);
    }
}
