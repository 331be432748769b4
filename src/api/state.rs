//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ConfigLoader;
use crate::repository::MemoryStore;

/// Shared application state.
///
/// The configuration is read-only. The store sits behind one mutex so that
/// leave submissions, approvals and rejections are applied one at a time.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<Mutex<MemoryStore>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: ConfigLoader, store: MemoryStore) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the shared store.
    pub fn store(&self) -> &Mutex<MemoryStore> {
        &self.store
    }
}
