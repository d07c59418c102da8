//! Remote config-server lookup.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::http::{HttpClient, HttpRequest, ReqwestClient};

use super::{LocatorError, ResourceLocator};

const DOCUMENT_MEDIA_TYPES: &str = "application/yaml, application/json, text/plain;q=0.5, */*;q=0.1";

/// Locator fetching documents from a remote configuration server.
///
/// Each logical path is requested as `GET {base}/{service}/{path}`; the
/// server answers with a document already filtered to one logical service.
/// `404 Not Found` means "not found"; any other non-2xx status is an error.
///
/// # Type Parameters
///
/// * `H` - The [`HttpClient`] used for requests (defaults to [`ReqwestClient`])
#[derive(Debug, Clone)]
pub struct RemoteLocator<H = ReqwestClient> {
    client: H,
    base_url: Url,
    service: String,
    timeout: Duration,
}

impl RemoteLocator<ReqwestClient> {
    /// Creates a remote locator using the production HTTP client.
    #[must_use]
    pub fn new(base_url: Url, service: impl Into<String>) -> Self {
        Self::with_client(ReqwestClient::new(), base_url, service)
    }
}

impl<H> RemoteLocator<H> {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a remote locator with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: H, mut base_url: Url, service: impl Into<String>) -> Self {
        // Url::join replaces the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client,
            base_url,
            service: service.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the HTTP client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }

    /// Returns the service name documents are scoped to.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    fn url_for(&self, path: &str) -> Result<Url, LocatorError> {
        self.base_url
            .join(&format!("{}/{path}", self.service))
            .map_err(|e| LocatorError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl<H: HttpClient> ResourceLocator for RemoteLocator<H> {
    async fn find(&self, path: &str) -> Result<Option<Vec<u8>>, LocatorError> {
        let url = self.url_for(path)?;
        let request = HttpRequest::get(url.clone())
            .accepting(DOCUMENT_MEDIA_TYPES)
            .with_timeout(self.timeout);

        let response = self.client.request(request).await?;

        if response.is_not_found() {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(LocatorError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }

        tracing::trace!("Fetched {} bytes from {url}", response.body.len());
        Ok(Some(response.body))
    }

    fn base_path(&self) -> String {
        format!("{}{}", self.base_url, self.service)
    }
}
