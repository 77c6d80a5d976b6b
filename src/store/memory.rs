/*!
 * In-memory script store.
 */

use std::collections::BTreeMap;

use log::debug;
use parking_lot::RwLock;

use super::notifier::{ChangeEvent, ChangeNotifier, Listener, SubscriptionId};
use super::{ScriptStore, StoreResult};

/// Store backed by a map in process memory; never fails
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
    notifier: ChangeNotifier,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with entries; no events are published for them
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(map),
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ScriptStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        debug!("Stored {} bytes under '{}'", value.len(), key);
        self.notifier.publish(&ChangeEvent::set(key, value));
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let removed = self.entries.write().remove(key).is_some();
        self.notifier.publish(&ChangeEvent::remove(key));
        Ok(removed)
    }

    fn clear(&self) -> StoreResult<()> {
        self.entries.write().clear();
        self.notifier.publish(&ChangeEvent::clear());
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}
