//! Prefix facade.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::provider::{ChangeSet, ConfigProvider, Property};

use super::Subscription;

type GroupCallback = Arc<dyn Fn(&[String]) + Send + Sync>;

struct Shared {
    properties: IndexMap<String, Arc<Property>>,
    values: IndexMap<String, String>,
    callback: Option<GroupCallback>,
}

impl Shared {
    fn refresh(&mut self, provider: &ConfigProvider, prefix: &str) {
        self.properties = provider.properties_by_prefix(prefix);
        self.values = self
            .properties
            .iter()
            .map(|(name, property)| (name.clone(), property.value()))
            .collect();
    }
}

/// Cached view of every property under `prefix.`.
///
/// The view is recomputed once per reconciliation cycle that touches any key
/// under the prefix, and the callback receives all affected keys of that
/// cycle in one call.
pub struct ConfigPropertyGroup {
    prefix: String,
    shared: Arc<Mutex<Shared>>,
    _subscription: Subscription,
}

impl ConfigPropertyGroup {
    /// Snapshots every property under `prefix.` and subscribes to changes.
    #[must_use]
    pub fn new(provider: &Arc<ConfigProvider>, prefix: &str) -> Self {
        let mut initial = Shared {
            properties: IndexMap::new(),
            values: IndexMap::new(),
            callback: None,
        };
        initial.refresh(provider, prefix);
        let shared = Arc::new(Mutex::new(initial));

        let weak = Arc::downgrade(provider);
        let listener_shared = Arc::clone(&shared);
        let dotted = format!("{prefix}.");
        let listener_prefix = prefix.to_string();
        let id = provider.add_listener(move |changes: &ChangeSet| {
            let affected: Vec<String> = changes
                .affected()
                .filter(|name| name.starts_with(&dotted))
                .map(ToString::to_string)
                .collect();
            if affected.is_empty() {
                return;
            }
            let Some(provider) = weak.upgrade() else {
                return;
            };

            let callback = {
                let mut shared = listener_shared.lock();
                shared.refresh(&provider, &listener_prefix);
                shared.callback.clone()
            };
            if let Some(callback) = callback {
                callback(&affected);
            }
        });

        Self {
            prefix: prefix.to_string(),
            shared,
            _subscription: Subscription {
                provider: Arc::clone(provider),
                id,
            },
        }
    }

    /// The group prefix, without the trailing dot.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full property names mapped to their values.
    #[must_use]
    pub fn values(&self) -> IndexMap<String, String> {
        self.shared.lock().values.clone()
    }

    /// The value of `prefix.relative_key`.
    #[must_use]
    pub fn get(&self, relative_key: &str) -> Option<String> {
        let name = format!("{}.{relative_key}", self.prefix);
        self.shared.lock().values.get(&name).cloned()
    }

    /// Full property names mapped to their live properties.
    #[must_use]
    pub fn properties(&self) -> IndexMap<String, Arc<Property>> {
        self.shared.lock().properties.clone()
    }

    /// Number of properties in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().values.len()
    }

    /// Returns true if no property is under the prefix.
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

impl std::fmt::Debug for ConfigPropertyGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigPropertyGroup")
            .field("prefix", &self.prefix)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
