//! Error types for the configuration provider.

use thiserror::Error;

use crate::locator::SearchLocation;
use crate::resolver::ResolveError;

/// Errors surfaced by [`super::ConfigProvider`] to direct API callers.
///
/// Background reconciliation never returns these; it logs and continues.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No locator/profile combination produced the resource.
    #[error("Resource '{name}' not found; searched: {}", join_locations(.searched))]
    ResourceNotFound {
        /// The requested resource name
        name: String,
        /// Every location attempted, in search order
        searched: Vec<SearchLocation>,
    },

    /// A required property is absent.
    #[error("Property '{name}' not found")]
    PropertyNotFound {
        /// The requested property name
        name: String,
    },

    /// The first reconciliation loaded no document at all.
    #[error("No configuration documents loaded; searched: {}", join_locations(.searched))]
    NoDocumentsLoaded {
        /// Every location attempted, in load order
        searched: Vec<SearchLocation>,
    },

    /// A value could not be resolved during the first reconciliation.
    #[error("Failed to resolve '{name}' during initial load: {source}")]
    InitialResolution {
        /// The property that failed
        name: String,
        /// Underlying resolver error
        #[source]
        source: ResolveError,
    },

    /// The resource was found but is not valid UTF-8.
    #[error("Resource '{name}' is not valid UTF-8: {source}")]
    ResourceNotUtf8 {
        /// The requested resource name
        name: String,
        /// Underlying decoding error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

fn join_locations(searched: &[SearchLocation]) -> String {
    if searched.is_empty() {
        return "(no locators registered)".to_string();
    }
    searched
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
