//! Construction of a [`ConfigProvider`].

use std::sync::Arc;
use std::time::Duration;

use crate::locator::ResourceLocator;
use crate::resolver::{PropertyResolver, ResolverChain};

use super::{ConfigProvider, ProviderError};

/// Builder for [`ConfigProvider`].
///
/// # Example
///
/// ```no_run
/// use dynconf::locator::FileLocator;
/// use dynconf::provider::ConfigProvider;
/// use dynconf::resolver::SecretHeuristicResolver;
///
/// # async fn example() -> Result<(), dynconf::provider::ProviderError> {
/// let provider = ConfigProvider::builder()
///     .locator(FileLocator::new("/etc/myapp"))
///     .resolver(SecretHeuristicResolver::default())
///     .profiles(["default", "prod"])
///     .build()
///     .await?;
///
/// let port = provider.property_or("server.port", "8080");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
#[must_use]
pub struct ConfigProviderBuilder {
    locators: Vec<Arc<dyn ResourceLocator>>,
    resolvers: ResolverChain,
    documents: Vec<String>,
    profiles: Vec<String>,
    reload_interval: Duration,
}

impl std::fmt::Debug for ConfigProviderBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProviderBuilder")
            .field("locators", &self.locators.len())
            .field("resolvers", &self.resolvers)
            .field("documents", &self.documents)
            .field("profiles", &self.profiles)
            .field("reload_interval", &self.reload_interval)
            .finish()
    }
}

impl ConfigProviderBuilder {
    /// Document name loaded when none is registered.
    pub const DEFAULT_DOCUMENT: &'static str = "application.yaml";

    /// Profile used when none is configured.
    pub const DEFAULT_PROFILE: &'static str = "default";

    /// Creates a builder with no locators, no resolvers and reloading disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a locator. Later registrations take priority.
    pub fn locator(self, locator: impl ResourceLocator + 'static) -> Self {
        self.shared_locator(Arc::new(locator))
    }

    /// Registers an already shared locator.
    pub fn shared_locator(mut self, locator: Arc<dyn ResourceLocator>) -> Self {
        self.locators.push(locator);
        self
    }

    /// Appends a resolver to the chain.
    pub fn resolver(mut self, resolver: impl PropertyResolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    /// Bounds each resolver call; a call that overruns fails its property.
    pub const fn resolver_timeout(mut self, timeout: Duration) -> Self {
        self.resolvers.set_call_timeout(timeout);
        self
    }

    /// Registers a document base name, e.g. `application.yaml`.
    ///
    /// Documents are overlaid in registration order within each profile.
    pub fn document(mut self, name: impl Into<String>) -> Self {
        self.documents.push(name.into());
        self
    }

    /// Sets the profile list; later profiles override earlier ones.
    pub fn profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles = profiles.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the background reload interval. Zero disables reloading.
    pub const fn reload_interval(mut self, interval: Duration) -> Self {
        self.reload_interval = interval;
        self
    }

    /// Builds the provider and performs the first reconciliation.
    ///
    /// If a non-zero reload interval was set, the background reload task is
    /// started as well.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::NoDocumentsLoaded`] if no document was found
    /// - [`ProviderError::InitialResolution`] if a value could not be resolved
    pub async fn build(mut self) -> Result<Arc<ConfigProvider>, ProviderError> {
        if self.documents.is_empty() {
            self.documents.push(Self::DEFAULT_DOCUMENT.to_string());
        }
        if self.profiles.is_empty() {
            self.profiles.push(Self::DEFAULT_PROFILE.to_string());
        }

        let provider = Arc::new(ConfigProvider::new(
            self.locators,
            self.resolvers,
            self.documents,
            self.profiles,
            self.reload_interval,
        ));

        provider.initialize().await?;

        if !self.reload_interval.is_zero() {
            provider.start_reloading();
        }

        Ok(provider)
    }
}
