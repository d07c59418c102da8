//! In-memory resource bundle.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{LocatorError, ResourceLocator};

/// Locator over resources held in memory.
///
/// Plays the role of a classpath bundle: the composition root registers
/// documents (typically via `include_str!`/`include_bytes!`) under their
/// logical paths. Resources can also be replaced at runtime, which makes
/// this locator convenient for programmatic sources and tests.
///
/// # Example
///
/// ```
/// use dynconf::locator::EmbeddedLocator;
///
/// let bundle = EmbeddedLocator::new("app")
///     .with_resource("default/application.yaml", "server:\n  port: 8080\n");
/// assert!(bundle.contains("default/application.yaml"));
/// ```
#[derive(Debug, Default)]
pub struct EmbeddedLocator {
    name: String,
    resources: RwLock<HashMap<String, Vec<u8>>>,
}

impl EmbeddedLocator {
    /// Creates an empty bundle with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: RwLock::new(HashMap::new()),
        }
    }

    /// Adds a resource (builder style).
    #[must_use]
    pub fn with_resource(self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    /// Adds or replaces a resource.
    pub fn insert(&self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.resources.write().insert(path.into(), content.into());
    }

    /// Removes a resource, returning true if it existed.
    pub fn remove(&self, path: &str) -> bool {
        self.resources.write().remove(path).is_some()
    }

    /// Returns true if the bundle holds the given path.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.resources.read().contains_key(path)
    }
}

#[async_trait]
impl ResourceLocator for EmbeddedLocator {
    async fn find(&self, path: &str) -> Result<Option<Vec<u8>>, LocatorError> {
        Ok(self.resources.read().get(path).cloned())
    }

    fn base_path(&self) -> String {
        format!("embedded:{}", self.name)
    }
}
