//! Resource locators: pluggable sources of raw configuration documents.
//!
//! This module provides:
//! - The locator capability ([`ResourceLocator`]) and its error type ([`LocatorError`])
//! - Diagnostics for failed lookups ([`SearchLocation`])
//! - In-memory bundles ([`EmbeddedLocator`])
//! - Filesystem lookup under a base directory ([`FileLocator`])
//! - Remote config-server lookup ([`RemoteLocator`])
//! - Key-value store lookup ([`StoreLocator`], [`KeyValueStore`], [`JsonFileStore`], [`MemoryStore`])
//!
//! Logical resource paths look like `<profile>/<file name>`, e.g.
//! `default/application.yaml`.

mod embedded;
mod error;
mod file;
mod json_store;
mod remote;
mod store;


pub use embedded::EmbeddedLocator;
pub use error::{LocatorError, StoreError};
pub use file::FileLocator;
pub use json_store::JsonFileStore;
pub use remote::RemoteLocator;
pub use store::{KeyValueStore, MemoryStore, StoreLocator};

use std::fmt;

use async_trait::async_trait;

use crate::document::DocumentFormat;

/// A source capable of returning a resource's raw bytes given a logical path.
///
/// # Contract
///
/// - A missing resource is `Ok(None)`, never an error.
/// - Errors describe locator-internal failures (I/O, malformed remote
///   responses, store corruption). Callers treat them as "not found in this
///   locator" and move on to the next one.
/// - [`base_path`](Self::base_path) is for diagnostics only.
#[async_trait]
pub trait ResourceLocator: Send + Sync {
    /// Looks up the raw bytes of a resource.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError`] for failures other than "not found".
    async fn find(&self, path: &str) -> Result<Option<Vec<u8>>, LocatorError>;

    /// Looks up a resource and decodes it as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::Utf8`] if the resource is not valid UTF-8,
    /// or any error from [`find`](Self::find).
    async fn find_as_string(&self, path: &str) -> Result<Option<String>, LocatorError> {
        let Some(bytes) = self.find(path).await? else {
            return Ok(None);
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|source| LocatorError::Utf8 {
                path: path.to_string(),
                source,
            })
    }

    /// Looks up a registered configuration document.
    ///
    /// Reconciliation reads documents through this method. Locators that can
    /// provision missing documents (see [`StoreLocator`]) override it; the
    /// default is a plain [`find`](Self::find). Arbitrary resources are
    /// always read through `find`, which never creates anything.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError`] for failures other than "not found".
    async fn find_document(&self, path: &str) -> Result<Option<Vec<u8>>, LocatorError> {
        self.find(path).await
    }

    /// Looks up a resource and decodes it into a document tree.
    ///
    /// The format is picked from the path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::Document`] if the resource is malformed,
    /// or any error from [`find`](Self::find).
    async fn find_as_json(&self, path: &str) -> Result<Option<serde_json::Value>, LocatorError> {
        match self.find(path).await? {
            Some(bytes) => decode_document(path, &bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`find_as_json`](Self::find_as_json), but reads through
    /// [`find_document`](Self::find_document).
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::Document`] if the document is malformed,
    /// or any error from [`find_document`](Self::find_document).
    async fn load_document(&self, path: &str) -> Result<Option<serde_json::Value>, LocatorError> {
        match self.find_document(path).await? {
            Some(bytes) => decode_document(path, &bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Human-readable description of where this locator looks.
    fn base_path(&self) -> String;
}

/// One attempted lookup: which locator was asked for which profile path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchLocation {
    /// The locator's [`ResourceLocator::base_path`].
    pub locator: String,
    /// The profile searched.
    pub profile: String,
    /// The full logical path requested.
    pub path: String,
}

impl SearchLocation {
    /// Creates a search location record.
    #[must_use]
    pub fn new(
        locator: impl Into<String>,
        profile: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            locator: locator.into(),
            profile: profile.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for SearchLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path, self.locator)
    }
}

fn decode_document(path: &str, bytes: &[u8]) -> Result<serde_json::Value, LocatorError> {
    DocumentFormat::from_path(path)
        .decode(bytes)
        .map_err(|source| LocatorError::Document {
            path: path.to_string(),
            source,
        })
}

/// Builds the logical path `<profile>/<name>`.
#[must_use]
pub fn profile_path(profile: &str, name: &str) -> String {
    format!("{profile}/{name}")
}
