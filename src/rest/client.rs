//! CEX.IO REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::auth::{CredentialPolicy, Credentials, MillisecondNonce, NonceProvider};
use crate::error::CexError;
use crate::rest::endpoints::{CEXIO_BASE_URL, Endpoint};
use crate::rest::request::{AUTH_FIELDS, RequestBuilder, RequestDescriptor};
use crate::rest::response::classify_response;
use crate::rest::transport::{RetryConfig, Transport};
use crate::rest::types::{Market, Params, Visibility};

/// The CEX.IO REST API client.
///
/// Credentials are checked when the client is built, before any request is
/// made. Each call performs one HTTP exchange (plus transport retries) and
/// returns the decoded JSON body or a [`CexError`].
///
/// Clones share the connection pool and the nonce sequence. The pool is
/// released when the last clone is dropped or closed.
///
/// # Example
///
/// ```rust,no_run
/// use cexio_api_client::{CexRestClient, Market};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CexRestClient::new("up123456789", "your_api_key_here_xxxxxx", "your_api_secret_here_xxxxxx")?;
///
///     let ticker = client.get_ticker(&Market::default()).await?;
///     println!("Ticker: {ticker}");
///
///     let balance = client.get_balance().await?;
///     println!("Balance: {balance}");
///
///     client.close();
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CexRestClient {
    transport: Transport,
    requests: RequestBuilder,
}

impl CexRestClient {
    /// Create a client with default settings.
    pub fn new(
        username: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, CexError> {
        Self::builder(Credentials::new(username, api_key, api_secret)).build()
    }

    /// Create a new client builder.
    pub fn builder(credentials: Credentials) -> CexRestClientBuilder {
        CexRestClientBuilder::new(credentials)
    }

    /// Account username this client signs for.
    pub fn username(&self) -> &str {
        &self.requests.credentials().username
    }

    /// Retry and timeout settings in effect.
    pub fn retry_config(&self) -> &RetryConfig {
        self.transport.config()
    }

    /// Call a public command, appending `market` (default `BTC/USD`) to the path.
    pub async fn public_call(
        &self,
        command: &str,
        market: Option<&Market>,
        params: Option<Params>,
    ) -> Result<Value, CexError> {
        let default_market = Market::default();
        let market = market.unwrap_or(&default_market);
        self.dispatch(
            command,
            &market.segments(),
            params.unwrap_or_default(),
            Visibility::Public,
            Method::GET,
        )
        .await
    }

    /// Call a private command. Always POST, always signed.
    pub async fn private_call(
        &self,
        command: &str,
        params: Option<Params>,
    ) -> Result<Value, CexError> {
        self.dispatch(
            command,
            &[],
            params.unwrap_or_default(),
            Visibility::Private,
            Method::POST,
        )
        .await
    }

    /// Call a described endpoint after validating its path and parameters.
    pub async fn call(
        &self,
        endpoint: &Endpoint,
        path_args: &[&str],
        params: Params,
    ) -> Result<Value, CexError> {
        endpoint.validate(path_args, &params)?;
        let method = match endpoint.visibility {
            Visibility::Public => Method::GET,
            Visibility::Private => Method::POST,
        };
        self.dispatch(endpoint.command, path_args, params, endpoint.visibility, method)
            .await
    }

    /// Release the connection pool held by this handle.
    pub fn close(self) {
        tracing::debug!(username = self.username(), "closing client");
    }

    /// Build a request without sending it.
    pub fn prepare(
        &self,
        command: &str,
        path_args: &[&str],
        params: Params,
        visibility: Visibility,
    ) -> Result<RequestDescriptor, CexError> {
        let method = match visibility {
            Visibility::Public => Method::GET,
            Visibility::Private => Method::POST,
        };
        self.requests
            .build(command, path_args, params, visibility, method)
    }

    pub(crate) async fn dispatch(
        &self,
        command: &str,
        path_args: &[&str],
        params: Params,
        visibility: Visibility,
        method: Method,
    ) -> Result<Value, CexError> {
        let request = self
            .requests
            .build(command, path_args, params, visibility, method)?;
        log_call(&request);
        self.execute(&request).await
    }

    pub(crate) async fn execute(&self, request: &RequestDescriptor) -> Result<Value, CexError> {
        let response = self.transport.send(request).await?;
        classify_response(&request.command, response).await
    }

    pub(crate) fn requests(&self) -> &RequestBuilder {
        &self.requests
    }
}

fn log_call(request: &RequestDescriptor) {
    let command = request.command.as_str();
    match request.visibility {
        Visibility::Private => {
            let fields: Vec<&str> = request
                .params
                .keys()
                .map(String::as_str)
                .filter(|name| !AUTH_FIELDS.contains(name))
                .collect();
            tracing::info!(command, ?fields, "making private API call");
        }
        Visibility::Public => {
            tracing::info!(command, params = ?request.params, "making public API call");
        }
    }
}

impl std::fmt::Debug for CexRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CexRestClient")
            .field("requests", &self.requests)
            .field("transport", &self.transport)
            .finish()
    }
}

/// Builder for [`CexRestClient`].
pub struct CexRestClientBuilder {
    base_url: String,
    credentials: Credentials,
    credential_policy: CredentialPolicy,
    nonce_provider: Option<Arc<dyn NonceProvider>>,
    user_agent: Option<String>,
    retry: RetryConfig,
}

impl CexRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: CEXIO_BASE_URL.to_string(),
            credentials,
            credential_policy: CredentialPolicy::default(),
            nonce_provider: None,
            user_agent: None,
            retry: RetryConfig::default(),
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the minimum key and secret lengths accepted at build time.
    pub fn credential_policy(mut self, policy: CredentialPolicy) -> Self {
        self.credential_policy = policy;
        self
    }

    /// Set a custom nonce provider.
    pub fn nonce_provider(mut self, provider: Arc<dyn NonceProvider>) -> Self {
        self.nonce_provider = Some(provider);
        self
    }

    /// Override the default `bot-cex.io-{username}` user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace all retry and timeout settings.
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the maximum number of retries for transient failures.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.retry.max_retries = retries;
        self
    }

    /// Set the delay before the first retry.
    pub fn backoff_factor(mut self, factor: Duration) -> Self {
        self.retry.backoff_factor = factor;
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.retry.timeout = timeout;
        self
    }

    /// Validate credentials and build the client. No network I/O happens here.
    pub fn build(self) -> Result<CexRestClient, CexError> {
        self.credential_policy.check(&self.credentials)?;

        let nonce_provider = self
            .nonce_provider
            .unwrap_or_else(|| Arc::new(MillisecondNonce::new()));
        let requests =
            RequestBuilder::new(self.base_url, self.credentials, nonce_provider, self.user_agent)?;
        let transport = Transport::new(self.retry)?;

        Ok(CexRestClient {
            transport,
            requests,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "HZxKnE4ua8cTr2JdLq7Mw5Ys";
    const SECRET: &str = "Q2Fg8dR4kLm9Zx7Tp3Wv5Ys1Nb6";

    #[test]
    fn test_short_credentials_fail_fast() {
        let result = CexRestClient::new("trader", "short", SECRET);
        assert!(matches!(result, Err(CexError::InvalidCredentials(_))));
        let result = CexRestClient::new("trader", KEY, "");
        assert!(matches!(result, Err(CexError::InvalidCredentials(_))));
    }

    #[test]
    fn test_valid_credentials_build() {
        let client = CexRestClient::new("trader", KEY, SECRET).unwrap();
        assert_eq!(client.username(), "trader");
        assert_eq!(client.retry_config(), &RetryConfig::default());
    }

    #[test]
    fn test_relaxed_policy() {
        let client = CexRestClient::builder(Credentials::new("trader", "abcd", "efgh"))
            .credential_policy(CredentialPolicy {
                min_key_len: 4,
                min_secret_len: 4,
            })
            .build();
        assert!(client.is_ok());
    }

    #[test]
    fn test_builder_retry_settings() {
        let client = CexRestClient::builder(Credentials::new("trader", KEY, SECRET))
            .max_retries(5)
            .backoff_factor(Duration::from_millis(10))
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let config = client.retry_config();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.backoff_factor, Duration::from_millis(10));
        assert_eq!(config.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_debug_hides_secret() {
        let client = CexRestClient::new("trader", KEY, SECRET).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("trader"));
    }

    #[test]
    fn test_prepare_public_has_no_auth_fields() {
        let client = CexRestClient::new("trader", KEY, SECRET).unwrap();
        let request = client
            .prepare("ticker", &["BTC", "USD"], Params::new(), Visibility::Public)
            .unwrap();
        assert!(AUTH_FIELDS.iter().all(|f| !request.params.contains_key(*f)));
    }
}
