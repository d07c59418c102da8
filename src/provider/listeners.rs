//! Subscription registry for change notifications.
//!
//! Listeners are stored under a key: a property name for property observers,
//! or [`ALL`] for provider-level listeners that receive whole change sets.
//! Delivery iterates a snapshot taken before the first call, so listeners
//! may register or unregister (themselves included) while being notified.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{ChangeSet, PropertyEvent};

/// Registry key for provider-level listeners.
pub const ALL: &str = "*";

/// Handle returned on registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Callback receiving every non-empty change set.
pub type ChangeListener = Arc<dyn Fn(&ChangeSet) + Send + Sync>;

/// Callback receiving changes of a single property.
pub type PropertyObserver = Arc<dyn Fn(&PropertyEvent) + Send + Sync>;

#[derive(Clone)]
enum Listener {
    Changes(ChangeListener),
    Property(PropertyObserver),
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    by_key: HashMap<String, Vec<(ListenerId, Listener)>>,
    keys: HashMap<ListenerId, String>,
}

/// Thread-safe registry of listeners keyed by property name or [`ALL`].
#[derive(Default)]
pub struct ListenerRegistry {
    inner: Mutex<Inner>,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, key: &str, listener: Listener) -> ListenerId {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner
            .by_key
            .entry(key.to_string())
            .or_default()
            .push((id, listener));
        inner.keys.insert(id, key.to_string());
        id
    }

    /// Registers a provider-level listener.
    pub fn add_listener(&self, listener: ChangeListener) -> ListenerId {
        self.insert(ALL, Listener::Changes(listener))
    }

    /// Registers an observer for one property.
    pub fn observe(&self, name: &str, observer: PropertyObserver) -> ListenerId {
        self.insert(name, Listener::Property(observer))
    }

    /// Unregisters a listener. Returns false if it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.lock();
        let Some(key) = inner.keys.remove(&id) else {
            return false;
        };
        if let Some(listeners) = inner.by_key.get_mut(&key) {
            listeners.retain(|(existing, _)| *existing != id);
            if listeners.is_empty() {
                inner.by_key.remove(&key);
            }
        }
        true
    }

    /// Number of registered listeners under `key`.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        self.inner.lock().by_key.get(key).map_or(0, Vec::len)
    }

    fn snapshot(&self, key: &str) -> Vec<Listener> {
        self.inner
            .lock()
            .by_key
            .get(key)
            .map(|listeners| listeners.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default()
    }

    /// Delivers `event` to the observers of its property.
    pub fn notify_property(&self, event: &PropertyEvent) {
        for listener in self.snapshot(event.name()) {
            if let Listener::Property(observer) = listener {
                deliver(event.name(), || observer(event));
            }
        }
    }

    /// Delivers `changes` to every provider-level listener.
    pub fn notify_changes(&self, changes: &ChangeSet) {
        for listener in self.snapshot(ALL) {
            if let Listener::Changes(callback) = listener {
                deliver(ALL, || callback(changes));
            }
        }
    }
}

/// Runs one listener call, logging instead of propagating a panic.
fn deliver(key: &str, call: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(call)).is_err() {
        tracing::error!("Change listener for '{key}' panicked; continuing delivery");
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ListenerRegistry")
            .field("listeners", &inner.keys.len())
            .finish()
    }
}
