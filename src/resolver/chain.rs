//! Ordered composition of resolvers.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::{PropertyResolver, ResolveError};

/// Resolvers applied in registration order, each seeing the previous output.
///
/// An empty chain is the identity. A property is sensitive if any resolver
/// flags it. Each resolver call is bounded by the chain's call timeout, so a
/// hung resolver cannot stall reconciliation.
#[derive(Clone)]
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn PropertyResolver>>,
    call_timeout: Duration,
}

impl ResolverChain {
    /// Upper bound for one resolver call, retries included.
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
            call_timeout: Self::DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Sets the per-resolver call timeout.
    pub const fn set_call_timeout(&mut self, timeout: Duration) {
        self.call_timeout = timeout;
    }

    /// Sets the per-resolver call timeout, builder style.
    #[must_use]
    pub const fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// The per-resolver call timeout.
    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Appends a resolver to the end of the chain.
    pub fn push(&mut self, resolver: Arc<dyn PropertyResolver>) {
        self.resolvers.push(resolver);
    }

    /// Appends a resolver, builder style.
    #[must_use]
    pub fn with(mut self, resolver: impl PropertyResolver + 'static) -> Self {
        self.push(Arc::new(resolver));
        self
    }

    /// Number of resolvers in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Returns true if the chain has no resolvers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Runs `raw` through every resolver in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ResolveError`] raised, or
    /// [`ResolveError::TimedOut`] when a resolver exceeds the call timeout.
    /// Later resolvers are not run.
    pub async fn resolve(&self, name: &str, raw: &str) -> Result<String, ResolveError> {
        let mut value = raw.to_string();
        for resolver in &self.resolvers {
            value = tokio::time::timeout(self.call_timeout, resolver.resolve(name, &value))
                .await
                .map_err(|_| ResolveError::TimedOut {
                    name: name.to_string(),
                    after: self.call_timeout,
                })??;
        }
        Ok(value)
    }

    /// Returns true if any resolver considers the property sensitive.
    #[must_use]
    pub fn is_sensitive(&self, name: &str, raw: &str) -> bool {
        self.resolvers.iter().any(|r| r.is_sensitive(name, raw))
    }
}

impl Default for ResolverChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverChain")
            .field("len", &self.resolvers.len())
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}
