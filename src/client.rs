//! Retrying HTTP transport
//!
//! [`RetryingClient`] wraps a single-attempt send primitive and absorbs
//! transient failures into backoff-timed retries. Two outcomes are
//! considered transient: a transport-level failure from the primitive
//! itself, and an explicit HTTP 503. Every other response, successful or
//! not, is returned to the caller immediately.
//!
//! Each call builds a fresh [`ExponentialBackoff`], so backoff state is
//! never shared between in-flight requests and the client can be cloned
//! freely across tasks.

use crate::backoff::ExponentialBackoff;
use crate::config::RetryConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// User agent sent with every request
const USER_AGENT: &str = concat!("housepix/", env!("CARGO_PKG_VERSION"));

/// Single-attempt request-send primitive
///
/// One implementation exists for [`reqwest::Client`] (a plain GET); tests
/// substitute their own to script failure sequences without a server.
#[async_trait]
pub trait SendRequest: Send + Sync {
    /// Issue the request once and return the response or the transport error
    async fn send(&self, url: &Url) -> std::result::Result<Response, reqwest::Error>;
}

#[async_trait]
impl SendRequest for Client {
    async fn send(&self, url: &Url) -> std::result::Result<Response, reqwest::Error> {
        self.get(url.clone()).send().await
    }
}

/// Builds the underlying HTTP client with user agent and timeouts
pub fn build_http_client() -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// HTTP transport wrapper that retries transient failures with backoff
#[derive(Clone, Debug)]
pub struct RetryingClient<S = Client> {
    inner: S,
    retry: RetryConfig,
}

impl RetryingClient<Client> {
    /// Create a retrying client over a default [`reqwest::Client`]
    pub fn new(retry: RetryConfig) -> std::result::Result<Self, reqwest::Error> {
        Ok(Self {
            inner: build_http_client()?,
            retry,
        })
    }
}

impl<S: SendRequest> RetryingClient<S> {
    /// Create a retrying client over a custom send primitive
    pub fn with_transport(inner: S, retry: RetryConfig) -> Self {
        Self { inner, retry }
    }

    /// GET a URL, retrying transport failures and HTTP 503 with backoff
    ///
    /// Every attempt re-issues the full request, which is safe here because
    /// all operations are reads. Waiting suspends only the calling task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RetryExhausted`] wrapping the last transient error
    /// once the backoff policy's elapsed cap is reached, or the original
    /// error immediately if it is not retryable at the transport level.
    pub async fn get(&self, url: &Url) -> Result<Response> {
        let mut backoff = ExponentialBackoff::new(&self.retry);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let err = match self.inner.send(url).await {
                Ok(resp) if resp.status() == StatusCode::SERVICE_UNAVAILABLE => {
                    Error::ServiceUnavailable {
                        url: url.to_string(),
                    }
                }
                Ok(resp) => return Ok(resp),
                Err(e) => Error::Network(e),
            };

            if !err.is_retryable() {
                return Err(err);
            }

            match backoff.next_interval() {
                Some(wait) => {
                    tracing::warn!(
                        url = %url,
                        attempt = attempts,
                        wait_ms = wait.as_millis() as u64,
                        error = %err,
                        "Transient failure, retrying"
                    );
                    tokio::time::sleep(wait).await;
                }
                None => {
                    tracing::error!(
                        url = %url,
                        attempts = attempts,
                        error = %err,
                        "Retries exhausted"
                    );
                    return Err(Error::RetryExhausted {
                        url: url.to_string(),
                        attempts,
                        source: Box::new(err),
                    });
                }
            }
        }
    }
}
