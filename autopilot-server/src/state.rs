//! Application state for autopilot-server

use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::live::ChangeHub;
use crate::store::{DataStore, MemoryStore, PgStore, StoreError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Privileged store client
    pub store: Arc<dyn DataStore>,
    /// Public key accepted from dashboard callers
    pub anon_key: Arc<str>,
}

impl AppState {
    /// Connect the configured store backend
    ///
    /// For PostgreSQL this runs migrations and starts the change listener.
    pub async fn new(config: &Config) -> Result<Self, StoreError> {
        let hub = ChangeHub::new();
        let store: Arc<dyn DataStore> = match &config.store_backend {
            StoreBackend::Postgres { database_url } => {
                let store = PgStore::connect(database_url, hub).await?;
                store.spawn_listener();
                tracing::info!("PostgreSQL store ready");
                Arc::new(store)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on exit");
                Arc::new(MemoryStore::new(hub))
            }
        };
        Ok(Self::with_store(store, &config.anon_key))
    }

    pub fn with_store(store: Arc<dyn DataStore>, anon_key: &str) -> Self {
        Self {
            store,
            anon_key: Arc::from(anon_key),
        }
    }

    pub fn changes(&self) -> &ChangeHub {
        self.store.changes()
    }
}
