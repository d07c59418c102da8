//! Error types for locators and key-value stores.

use std::path::PathBuf;

use thiserror::Error;

use crate::document::DocumentError;
use crate::http::HttpError;

/// A locator failed for a reason other than "not found".
#[derive(Debug, Error)]
pub enum LocatorError {
    /// Reading from the filesystem failed.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        /// The file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The requested path is not acceptable for this locator.
    #[error("Invalid resource path '{path}': {reason}")]
    InvalidPath {
        /// The rejected path
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// The remote request failed at the transport level.
    #[error("Remote request failed: {0}")]
    Http(#[from] HttpError),

    /// The remote server answered with an unexpected status.
    #[error("Remote server returned {status} for '{url}'")]
    Status {
        /// The requested URL
        url: String,
        /// The status received
        status: http::StatusCode,
    },

    /// The backing key-value store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The resource is not valid UTF-8.
    #[error("Resource '{path}' is not valid UTF-8: {source}")]
    Utf8 {
        /// The resource path
        path: String,
        /// Underlying decoding error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The resource was found but is not a well-formed document.
    #[error("Resource '{path}' is malformed: {source}")]
    Document {
        /// The resource path
        path: String,
        /// Underlying decoding error
        #[source]
        source: DocumentError,
    },
}

/// Errors from a [`super::KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the store.
    #[error("Failed to read store: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to write the store.
    #[error("Failed to write store: {0}")]
    Write(#[source] std::io::Error),

    /// Failed to serialize the store contents.
    #[error("Failed to serialize store: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The store exists but its contents are unusable.
    #[error("Store is corrupted: {reason}")]
    Corrupted {
        /// Reason for corruption
        reason: String,
    },
}
