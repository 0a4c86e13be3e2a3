//! HTTP transport with bounded retry and exponential backoff.
//!
//! Retries cover connection failures, read failures and timeouts, and the
//! statuses in [`RETRYABLE_STATUSES`]. POST requests are retried as well: the
//! library does not deduplicate writes, so a retried `place_order` may reach
//! the exchange more than once.

use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{
    Jitter, Retryable, RetryableStrategy, RetryTransientMiddleware, default_on_request_failure,
};
use reqwest_tracing::TracingMiddleware;

use crate::error::{CexError, NetworkError};
use crate::rest::request::RequestDescriptor;

/// HTTP statuses that are retried automatically.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Retry and timeout settings for the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for every further retry.
    pub backoff_factor: Duration,
    /// Upper bound for a single backoff delay.
    pub max_backoff: Duration,
    /// Per-attempt request timeout.
    pub timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: Duration::from_millis(300),
            max_backoff: Duration::from_secs(30),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `retry` (zero-based), without jitter.
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.backoff_factor
            .saturating_mul(factor)
            .min(self.max_backoff.max(self.backoff_factor))
    }
}

/// Retries the fixed status set plus transient connection errors.
struct RetryableStatuses;

impl RetryableStrategy for RetryableStatuses {
    fn handle(&self, res: &Result<Response, reqwest_middleware::Error>) -> Option<Retryable> {
        match res {
            Ok(response) if is_retryable(response.status()) => Some(Retryable::Transient),
            Ok(_) => None,
            Err(error) => default_on_request_failure(error),
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status.as_u16())
}

/// Owns the connection pool for one client.
#[derive(Clone)]
pub(crate) struct Transport {
    http_client: ClientWithMiddleware,
    config: RetryConfig,
}

impl Transport {
    pub(crate) fn new(config: RetryConfig) -> Result<Self, CexError> {
        let reqwest_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NetworkError::from_reqwest("client setup", e))?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(config.backoff_factor, config.max_backoff.max(config.backoff_factor))
            .jitter(Jitter::None)
            .base(2)
            .build_with_max_retries(config.max_retries);

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                RetryableStatuses,
            ))
            .build();

        Ok(Self {
            http_client,
            config,
        })
    }

    pub(crate) fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Send a request, retrying transient failures.
    ///
    /// A response that still carries a retryable status after the last attempt
    /// is reported as [`NetworkError::RetriesExhausted`].
    pub(crate) async fn send(&self, request: &RequestDescriptor) -> Result<Response, NetworkError> {
        let command = request.command.as_str();
        tracing::debug!(command, method = %request.method, url = %request.url, "sending request");

        let builder = if request.method == Method::GET {
            self.http_client.get(request.url.clone())
        } else {
            self.http_client.request(request.method.clone(), request.url.clone())
        };
        let builder = builder.headers(request.headers.clone());
        let builder = match &request.body {
            Some(body) => builder.body(body.clone()),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            let error = NetworkError::from_middleware(command, e);
            tracing::warn!(command, %error, "request failed");
            error
        })?;

        let status = response.status();
        if is_retryable(status) {
            let error = NetworkError::RetriesExhausted {
                command: command.to_string(),
                status: status.as_u16(),
                attempts: self.config.max_retries + 1,
            };
            tracing::warn!(command, %error, "giving up on retryable status");
            return Err(error);
        }
        Ok(response)
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("config", &self.config)
            .finish()
    }
}
