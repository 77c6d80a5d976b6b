/*!
 * Change notification for script stores.
 *
 * Every mutation of a store is published as a [`ChangeEvent`] to the
 * listeners registered on its [`ChangeNotifier`]. Listeners run on the
 * mutating thread after the change is applied, in subscription order.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use log::trace;
use parking_lot::RwLock;
use serde::Serialize;

/// Callback invoked for every change published by a store
pub type Listener = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Kind of store mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Set,
    Remove,
    Clear,
}

/// A single store mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    // @field: None for Clear
    pub key: Option<String>,
    // @field: New value for Set, None otherwise
    pub value: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Set,
            key: Some(key.into()),
            value: Some(value.into()),
            timestamp: Utc::now(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Remove,
            key: Some(key.into()),
            value: None,
            timestamp: Utc::now(),
        }
    }

    pub fn clear() -> Self {
        Self {
            kind: ChangeKind::Clear,
            key: None,
            value: None,
            timestamp: Utc::now(),
        }
    }

    /// Whether this change can alter the value stored under `key`
    pub fn affects(&self, key: &str) -> bool {
        match self.kind {
            ChangeKind::Clear => true,
            ChangeKind::Set | ChangeKind::Remove => self.key.as_deref() == Some(key),
        }
    }
}

/// Registry of change listeners
pub struct ChangeNotifier {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        trace!("Registered change listener #{}", id.0);
        id
    }

    /// Remove a listener; false if the id is unknown
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        before != listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Deliver an event to every listener registered at the time of the call
    pub fn publish(&self, event: &ChangeEvent) {
        // Called on a snapshot: listeners may (un)subscribe re-entrantly
        let snapshot: Vec<Listener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        trace!("Publishing {:?} change to {} listeners", event.kind, snapshot.len());
        for listener in snapshot {
            listener(event);
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
