//! Property resolvers: value transformations applied before values are exposed.
//!
//! This module provides:
//! - The resolver capability ([`PropertyResolver`]) and its error type ([`ResolveError`])
//! - Ordered composition ([`ResolverChain`])
//! - A no-op resolver that flags secret-looking properties ([`SecretHeuristicResolver`])
//! - Remote decryption of marked ciphertext ([`RemoteDecryptResolver`])

mod chain;
mod error;
mod heuristic;
mod remote;

#[cfg(test)]
mod remote_tests;

pub use chain::ResolverChain;
pub use error::ResolveError;
pub use heuristic::SecretHeuristicResolver;
pub use remote::RemoteDecryptResolver;

use async_trait::async_trait;

/// Prefix marking a value as ciphertext that must be decrypted before use.
pub const CIPHER_MARKER: &str = "{cipher}";

/// Placeholder printed instead of sensitive values.
pub const MASK: &str = "******";

/// A transformation from a raw property value to the value exposed to callers.
///
/// # Contract
///
/// - `resolve` is idempotent and free of side effects visible to callers.
/// - Resolved values of sensitive properties must never be logged.
#[async_trait]
pub trait PropertyResolver: Send + Sync {
    /// Resolves the raw value of property `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if the value cannot be resolved. The caller
    /// keeps the property's previous values and retries on the next cycle.
    async fn resolve(&self, name: &str, raw: &str) -> Result<String, ResolveError>;

    /// Returns true if the property must be treated as a secret.
    fn is_sensitive(&self, _name: &str, _raw: &str) -> bool {
        false
    }
}

/// Strips [`CIPHER_MARKER`] from a value, returning the ciphertext.
#[must_use]
pub fn strip_cipher_marker(raw: &str) -> Option<&str> {
    raw.strip_prefix(CIPHER_MARKER)
}
