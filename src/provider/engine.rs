//! The configuration provider: namespace ownership and lookup APIs.

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};

use crate::locator::{ResourceLocator, SearchLocation, profile_path};
use crate::resolver::ResolverChain;

use super::listeners::{ListenerId, ListenerRegistry};
use super::{ChangeSet, ConfigProviderBuilder, Property, PropertyEvent, ProviderError};

/// Lifecycle of a [`ConfigProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    /// The first reconciliation has not completed yet.
    Uninitialized,
    /// Loaded; background reloading runs if configured.
    Ready,
    /// Background reloading was stopped.
    Stopped,
}

/// Layered configuration namespace fed by locators and resolvers.
///
/// Created through [`ConfigProvider::builder`]. All methods take `&self` and
/// are safe to call concurrently; reconciliations are serialized and each one
/// is committed atomically, so readers see either the previous or the next
/// namespace, never a mix.
pub struct ConfigProvider {
    pub(super) locators: Vec<Arc<dyn ResourceLocator>>,
    pub(super) resolvers: ResolverChain,
    pub(super) documents: Vec<String>,
    pub(super) profiles: RwLock<Vec<String>>,
    pub(super) namespace: RwLock<IndexMap<String, Arc<Property>>>,
    pub(super) listeners: ListenerRegistry,
    pub(super) reload_lock: tokio::sync::Mutex<()>,
    pub(super) state: Mutex<ProviderState>,
    pub(super) reload_interval: Duration,
    pub(super) stop_signal: Mutex<Option<tokio::sync::watch::Sender<bool>>>,
}

impl ConfigProvider {
    /// Returns a builder.
    pub fn builder() -> ConfigProviderBuilder {
        ConfigProviderBuilder::new()
    }

    pub(super) fn new(
        locators: Vec<Arc<dyn ResourceLocator>>,
        resolvers: ResolverChain,
        documents: Vec<String>,
        profiles: Vec<String>,
        reload_interval: Duration,
    ) -> Self {
        Self {
            locators,
            resolvers,
            documents,
            profiles: RwLock::new(profiles),
            namespace: RwLock::new(IndexMap::new()),
            listeners: ListenerRegistry::new(),
            reload_lock: tokio::sync::Mutex::new(()),
            state: Mutex::new(ProviderState::Uninitialized),
            reload_interval,
            stop_signal: Mutex::new(None),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ProviderState {
        *self.state.lock()
    }

    /// The active profile list, lowest priority first.
    #[must_use]
    pub fn profiles(&self) -> Vec<String> {
        self.profiles.read().clone()
    }

    /// The registered document base names.
    #[must_use]
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// The configured background reload interval (zero when disabled).
    #[must_use]
    pub const fn reload_interval(&self) -> Duration {
        self.reload_interval
    }

    /// Looks up a property by exact name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<Arc<Property>> {
        self.namespace.read().get(name).cloned()
    }

    /// Looks up a property that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::PropertyNotFound`] if it is absent.
    pub fn require(&self, name: &str) -> Result<Arc<Property>, ProviderError> {
        self.property(name)
            .ok_or_else(|| ProviderError::PropertyNotFound {
                name: name.to_string(),
            })
    }

    /// Looks up a property, synthesizing it from `default` if absent.
    ///
    /// The synthesized property stays in the namespace until a source
    /// provides the name, at which point it is overwritten in place and a
    /// single "changed" notification is delivered.
    pub fn property_or(&self, name: &str, default: &str) -> Arc<Property> {
        if let Some(property) = self.property(name) {
            return property;
        }
        let sensitive = self.resolvers.is_sensitive(name, default);
        let mut namespace = self.namespace.write();
        Arc::clone(namespace.entry(name.to_string()).or_insert_with(|| {
            tracing::debug!("Synthesizing default for '{name}'");
            Arc::new(Property::synthetic(name, default, sensitive))
        }))
    }

    /// All properties whose name starts with `prefix.`, in namespace order.
    #[must_use]
    pub fn properties_by_prefix(&self, prefix: &str) -> IndexMap<String, Arc<Property>> {
        let dotted = format!("{prefix}.");
        self.namespace
            .read()
            .iter()
            .filter(|(name, _)| name.starts_with(&dotted))
            .map(|(name, property)| (name.clone(), Arc::clone(property)))
            .collect()
    }

    /// Every property, in namespace order.
    #[must_use]
    pub fn properties(&self) -> Vec<Arc<Property>> {
        self.namespace.read().values().cloned().collect()
    }

    /// Resolved values of every property, in namespace order.
    ///
    /// Contains secrets in clear; use [`Property::display_value`] for output.
    #[must_use]
    pub fn snapshot(&self) -> IndexMap<String, String> {
        self.namespace
            .read()
            .iter()
            .map(|(name, property)| (name.clone(), property.value()))
            .collect()
    }

    /// Number of properties in the namespace.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespace.read().len()
    }

    /// Returns true if the namespace is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespace.read().is_empty()
    }

    /// Registers a provider-level listener, called once per cycle with the
    /// full change set whenever something changed.
    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ChangeSet) + Send + Sync + 'static,
    {
        self.listeners.add_listener(Arc::new(listener))
    }

    /// Number of registered provider-level listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.count(super::listeners::ALL)
    }

    /// Unregisters a provider-level listener.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Registers an observer for changes of a single property.
    pub fn observe<F>(&self, name: &str, observer: F) -> ListenerId
    where
        F: Fn(&PropertyEvent) + Send + Sync + 'static,
    {
        self.listeners.observe(name, Arc::new(observer))
    }

    /// Unregisters a property observer.
    pub fn unobserve(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Replaces the profile list, optionally reloading before returning.
    pub async fn set_profile_paths<I, S>(&self, profiles: I, reload_immediately: bool)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let profiles: Vec<String> = profiles.into_iter().map(Into::into).collect();
        tracing::info!("Profiles set to {profiles:?}");
        *self.profiles.write() = profiles;

        if reload_immediately {
            self.reload().await;
        }
    }

    /// Reads a raw resource `<profile>/<name>`.
    ///
    /// Locators are searched from the most recently registered backward;
    /// profiles are searched in order within each locator. The first hit
    /// wins. Locator errors are logged and treated as "not found".
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::ResourceNotFound`] listing every location
    /// searched.
    pub async fn resource_bytes(&self, name: &str) -> Result<Vec<u8>, ProviderError> {
        let profiles = self.profiles();
        let mut searched = Vec::with_capacity(self.locators.len() * profiles.len());

        for locator in self.locators.iter().rev() {
            for profile in &profiles {
                let path = profile_path(profile, name);
                match locator.find(&path).await {
                    Ok(Some(bytes)) => {
                        tracing::debug!("Resource '{path}' found in {}", locator.base_path());
                        return Ok(bytes);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("Locator {} failed for '{path}': {e}", locator.base_path());
                    }
                }
                searched.push(SearchLocation::new(locator.base_path(), profile, path));
            }
        }

        Err(ProviderError::ResourceNotFound {
            name: name.to_string(),
            searched,
        })
    }

    /// Reads a raw resource as UTF-8 text. See [`resource_bytes`](Self::resource_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::ResourceNotFound`] if no location has it, or
    /// [`ProviderError::ResourceNotUtf8`] if it is not text.
    pub async fn resource_string(&self, name: &str) -> Result<String, ProviderError> {
        let bytes = self.resource_bytes(name).await?;
        String::from_utf8(bytes).map_err(|source| ProviderError::ResourceNotUtf8 {
            name: name.to_string(),
            source,
        })
    }
}

impl std::fmt::Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProvider")
            .field("state", &self.state())
            .field("locators", &self.locators.len())
            .field("resolvers", &self.resolvers)
            .field("documents", &self.documents)
            .field("profiles", &self.profiles())
            .field("properties", &self.len())
            .field("reload_interval", &self.reload_interval)
            .finish_non_exhaustive()
    }
}
