//! Key-value store backed locator.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{LocatorError, ResourceLocator, StoreError};

/// A string key-value store holding whole documents.
///
/// Implementations must be safe to share across tasks.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be written.
    fn put(
        &self,
        key: &str,
        value: String,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Human-readable description of the store.
    fn describe(&self) -> String;
}

/// In-memory store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Locator that reads documents from a [`KeyValueStore`].
///
/// Resource paths are used as keys, optionally under a prefix. When a
/// configuration document is absent, [`find_document`] writes an empty one to
/// the store and returns it, so the store ends up with one entry per profile
/// document that operators can fill in later. Plain [`find`] lookups never
/// write.
///
/// [`find`]: ResourceLocator::find
/// [`find_document`]: ResourceLocator::find_document
#[derive(Debug)]
pub struct StoreLocator<S> {
    store: S,
    prefix: Option<String>,
}

impl<S: KeyValueStore> StoreLocator<S> {
    /// Creates a locator over the given store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            prefix: None,
        }
    }

    /// Scopes every key under `prefix/`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn key_for(&self, path: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}/{path}"),
            None => path.to_string(),
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> ResourceLocator for StoreLocator<S> {
    async fn find(&self, path: &str) -> Result<Option<Vec<u8>>, LocatorError> {
        let key = self.key_for(path);
        Ok(self.store.get(&key).await?.map(String::into_bytes))
    }

    async fn find_document(&self, path: &str) -> Result<Option<Vec<u8>>, LocatorError> {
        if let Some(document) = self.find(path).await? {
            return Ok(Some(document));
        }

        let key = self.key_for(path);
        tracing::debug!("Creating empty document '{key}' in {}", self.store.describe());
        self.store.put(&key, String::new()).await?;
        Ok(Some(Vec::new()))
    }

    fn base_path(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("store:{}/{prefix}", self.store.describe()),
            None => format!("store:{}", self.store.describe()),
        }
    }
}
