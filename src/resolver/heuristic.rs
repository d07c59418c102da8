//! Name/value heuristics for secret detection.

use async_trait::async_trait;
use regex::Regex;

use super::{CIPHER_MARKER, PropertyResolver, ResolveError};

/// Resolver that leaves values unchanged and flags secret-looking properties.
///
/// A property is sensitive when its name matches the pattern (by default a
/// case-insensitive secret-like suffix such as `password`, `token` or
/// `api-key`) or its value carries the [`CIPHER_MARKER`].
///
/// # Example
///
/// ```
/// use dynconf::resolver::{PropertyResolver, SecretHeuristicResolver};
///
/// let resolver = SecretHeuristicResolver::default();
/// assert!(resolver.is_sensitive("db.password", "hunter2"));
/// assert!(!resolver.is_sensitive("db.host", "localhost"));
/// ```
#[derive(Debug, Clone)]
pub struct SecretHeuristicResolver {
    name_pattern: Regex,
}

impl SecretHeuristicResolver {
    /// Default pattern matched against property names.
    pub const DEFAULT_PATTERN: &'static str =
        r"(?i)(password|passwd|secret|token|credentials?|private[._-]?key|api[._-]?key)$";

    /// Creates a resolver with a custom name pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name_pattern: Regex::new(pattern)?,
        })
    }

    /// Creates a resolver from an already compiled pattern.
    #[must_use]
    pub const fn from_regex(name_pattern: Regex) -> Self {
        Self { name_pattern }
    }

    /// Returns the name pattern.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Regex is not a const type
    pub fn pattern(&self) -> &Regex {
        &self.name_pattern
    }
}

impl Default for SecretHeuristicResolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATTERN).expect("default secret pattern is a valid regex")
    }
}

#[async_trait]
impl PropertyResolver for SecretHeuristicResolver {
    async fn resolve(&self, _name: &str, raw: &str) -> Result<String, ResolveError> {
        Ok(raw.to_string())
    }

    fn is_sensitive(&self, name: &str, raw: &str) -> bool {
        raw.starts_with(CIPHER_MARKER) || self.name_pattern.is_match(name)
    }
}
