//! Indexed list facade.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::provider::{ChangeSet, ConfigProvider};

use super::Subscription;

type ListCallback = Arc<dyn Fn(&[String]) + Send + Sync>;

struct Shared {
    values: Vec<String>,
    callback: Option<ListCallback>,
}

/// Reads `name[0]`, `name[1]`, ... until the first missing index.
fn read_items(provider: &ConfigProvider, name: &str) -> Vec<String> {
    (0..)
        .map_while(|index| provider.property(&format!("{name}[{index}]")))
        .map(|property| property.value())
        .collect()
}

/// Cached view of the scalar list stored under `name[0]`, `name[1]`, ...
///
/// Rebuilt whenever a cycle touches any `name[n]` key; the callback receives
/// the rebuilt list once per cycle.
pub struct ConfigPropertyList {
    name: String,
    shared: Arc<Mutex<Shared>>,
    _subscription: Subscription,
}

impl ConfigPropertyList {
    /// Builds the list and subscribes to changes.
    #[must_use]
    pub fn new(provider: &Arc<ConfigProvider>, name: &str) -> Self {
        let shared = Arc::new(Mutex::new(Shared {
            values: read_items(provider, name),
            callback: None,
        }));

        let weak = Arc::downgrade(provider);
        let listener_shared = Arc::clone(&shared);
        let listener_name = name.to_string();
        let indexed = format!("{name}[");
        let id = provider.add_listener(move |changes: &ChangeSet| {
            if !changes.affected().any(|key| key.starts_with(&indexed)) {
                return;
            }
            let Some(provider) = weak.upgrade() else {
                return;
            };

            let values = read_items(&provider, &listener_name);
            let callback = {
                let mut shared = listener_shared.lock();
                shared.values.clone_from(&values);
                shared.callback.clone()
            };
            if let Some(callback) = callback {
                callback(&values);
            }
        });

        Self {
            name: name.to_string(),
            shared,
            _subscription: Subscription {
                provider: Arc::clone(provider),
                id,
            },
        }
    }

    /// The list's base name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current elements, in index order.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        self.shared.lock().values.clone()
    }

    /// The element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<String> {
        self.shared.lock().values.get(index).cloned()
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().values.len()
    }

    /// Returns true if the list has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.lock().values.is_empty()
    }

    /// Sets the batched change callback, replacing any previous one.
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        self.shared.lock().callback = Some(Arc::new(callback));
    }
}

impl std::fmt::Debug for ConfigPropertyList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigPropertyList")
            .field("name", &self.name)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
