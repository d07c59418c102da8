//! Remote decryption of marked ciphertext.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::http::{HttpClient, HttpRequest, IsRetryable, ReqwestClient, RetryPolicy};
use crate::time::{Sleeper, TokioSleeper};

use super::{PropertyResolver, ResolveError, strip_cipher_marker};

/// Resolver that decrypts `{cipher}`-marked values through a remote endpoint.
///
/// Values without the marker pass through unchanged. Marked values have the
/// marker stripped and the ciphertext POSTed as `text/plain`; the response
/// body is the plaintext. Each attempt is bounded by a timeout, and
/// transient failures (transport errors, 5xx, 408, 429) are retried with
/// exponential backoff.
///
/// # Type Parameters
///
/// * `H` - The [`HttpClient`] used for requests (defaults to [`ReqwestClient`])
/// * `S` - The [`Sleeper`] used between retries (defaults to [`TokioSleeper`])
#[derive(Debug, Clone)]
pub struct RemoteDecryptResolver<H = ReqwestClient, S = TokioSleeper> {
    client: H,
    sleeper: S,
    endpoint: Url,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl RemoteDecryptResolver<ReqwestClient, TokioSleeper> {
    /// Creates a resolver using the production HTTP client and timer.
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(ReqwestClient::new(), TokioSleeper, endpoint)
    }
}

impl<H, S> RemoteDecryptResolver<H, S> {
    /// Default per-attempt timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a resolver with a custom HTTP client and sleeper.
    #[must_use]
    pub fn with_client(client: H, sleeper: S, endpoint: Url) -> Self {
        Self {
            client,
            sleeper,
            endpoint,
            timeout: Self::DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the HTTP client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }

    /// Returns the decryption endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl<H: HttpClient, S: Sleeper> RemoteDecryptResolver<H, S> {
    fn build_request(&self, ciphertext: &str) -> HttpRequest {
        HttpRequest::post(self.endpoint.clone())
            .with_text(ciphertext)
            .with_timeout(self.timeout)
    }

    /// Executes a single decryption attempt.
    async fn execute_request(
        &self,
        name: &str,
        request: &HttpRequest,
    ) -> Result<String, ResolveError> {
        let response = self
            .client
            .request(request.clone())
            .await
            .map_err(|source| ResolveError::Http {
                name: name.to_string(),
                source,
            })?;

        if !response.is_success() {
            return Err(ResolveError::Status {
                name: name.to_string(),
                status: response.status,
            });
        }

        response.into_text().map_err(|_| ResolveError::InvalidResponse {
            name: name.to_string(),
            reason: "plaintext is not valid UTF-8".to_string(),
        })
    }

    async fn decrypt_with_retry(
        &self,
        name: &str,
        ciphertext: &str,
    ) -> Result<String, ResolveError> {
        let request = self.build_request(ciphertext);

        let mut backoff = self.retry_policy.backoff();
        let mut attempt = 1;
        loop {
            let error = match self.execute_request(name, &request).await {
                Ok(plaintext) => return Ok(plaintext),
                Err(e) if e.is_retryable() => e,
                Err(e) => return Err(e),
            };
            let Some(delay) = backoff.next() else {
                return Err(error);
            };
            tracing::debug!(
                "Decrypting '{name}' failed (attempt {attempt}), retrying in {delay:?}: {error}"
            );
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl<H: HttpClient, S: Sleeper> PropertyResolver for RemoteDecryptResolver<H, S> {
    async fn resolve(&self, name: &str, raw: &str) -> Result<String, ResolveError> {
        match strip_cipher_marker(raw) {
            Some(ciphertext) => self.decrypt_with_retry(name, ciphertext).await,
            None => Ok(raw.to_string()),
        }
    }

    fn is_sensitive(&self, _name: &str, raw: &str) -> bool {
        strip_cipher_marker(raw).is_some()
    }
}
