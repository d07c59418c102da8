//! Error types for property resolution.

use std::time::Duration;

use thiserror::Error;

use crate::http::{HttpError, IsRetryable};

/// A resolver failed to produce a value.
///
/// Messages name the property but never include its value.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The resolution endpoint could not be reached.
    #[error("Failed to resolve '{name}': {source}")]
    Http {
        /// The property being resolved
        name: String,
        /// Underlying transport error
        #[source]
        source: HttpError,
    },

    /// The resolution endpoint answered with an unexpected status.
    #[error("Failed to resolve '{name}': endpoint returned {status}")]
    Status {
        /// The property being resolved
        name: String,
        /// The status received
        status: http::StatusCode,
    },

    /// The resolution endpoint returned an unusable body.
    #[error("Failed to resolve '{name}': {reason}")]
    InvalidResponse {
        /// The property being resolved
        name: String,
        /// What was wrong with the response
        reason: String,
    },

    /// A resolver rejected the value.
    #[error("Failed to resolve '{name}': {reason}")]
    Rejected {
        /// The property being resolved
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// A resolver did not finish within the chain's call timeout.
    #[error("Failed to resolve '{name}': no answer within {after:?}")]
    TimedOut {
        /// The property being resolved
        name: String,
        /// The timeout that elapsed
        after: Duration,
    },
}

impl ResolveError {
    /// Returns the name of the property that failed to resolve.
    #[must_use]
    pub fn property(&self) -> &str {
        match self {
            Self::Http { name, .. }
            | Self::Status { name, .. }
            | Self::InvalidResponse { name, .. }
            | Self::Rejected { name, .. }
            | Self::TimedOut { name, .. } => name,
        }
    }
}

impl IsRetryable for ResolveError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http { source, .. } => source.is_retryable(),
            Self::Status { status, .. } => status.is_retryable(),
            // the call timeout already spans the resolver's own retries
            Self::InvalidResponse { .. } | Self::Rejected { .. } | Self::TimedOut { .. } => false,
        }
    }
}
