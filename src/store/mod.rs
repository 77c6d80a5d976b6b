/*!
 * Key/value persistence for the current script text.
 *
 * A store maps string keys to string values and publishes every mutation
 * through its [`ChangeNotifier`]. Two backends are provided:
 * - `MemoryStore`: process memory, used for tests and `--memory-store`
 * - `SqliteStore`: a schema-versioned SQLite file in the platform data directory
 */

pub mod memory;
pub mod notifier;
pub mod schema;
pub mod sqlite;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::app_config::{StorageBackend, StorageConfig};
use crate::errors::StoreError;

pub use memory::MemoryStore;
pub use notifier::{ChangeEvent, ChangeKind, ChangeNotifier, Listener, SubscriptionId};
pub use sqlite::SqliteStore;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Observable string key/value store
pub trait ScriptStore: Send + Sync {
    /// Value under `key`, if any
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Insert or replace the value under `key`
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete `key`; false if it was absent. Listeners are notified either way
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Delete every key
    fn clear(&self) -> StoreResult<()>;

    /// All keys in ascending order
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Register a listener for every subsequent mutation
    fn subscribe(&self, listener: Listener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Open the store described by the storage configuration
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn ScriptStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::Sqlite => {
            let store = match &config.database_path {
                Some(path) => SqliteStore::open(path),
                None => SqliteStore::open_default(),
            }
            .context("Failed to open script store")?;
            Ok(Arc::new(store))
        }
    }
}
