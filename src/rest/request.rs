//! Request assembly: URL, headers, and parameters, with authentication for private calls.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use url::Url;

use crate::auth::{Credentials, NonceProvider, sign_request};
use crate::error::CexError;
use crate::rest::endpoints::HISTORICAL_OHLCV;
use crate::rest::types::{Params, Visibility};

/// Fields injected into every private call.
pub const AUTH_FIELDS: [&str; 3] = ["key", "signature", "nonce"];

/// A fully assembled request, ready for the transport.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Command name, used for logging and error context.
    pub command: String,
    pub method: Method,
    /// Target URL, including the query string for GET requests.
    pub url: Url,
    pub headers: HeaderMap,
    /// Parameters as sent, including auth fields for private calls.
    pub params: Params,
    /// JSON body for POST requests.
    pub body: Option<String>,
    pub visibility: Visibility,
}

/// Builds [`RequestDescriptor`]s for one account.
#[derive(Clone)]
pub(crate) struct RequestBuilder {
    base_url: String,
    credentials: Credentials,
    nonce_provider: Arc<dyn NonceProvider>,
    user_agent: HeaderValue,
}

impl RequestBuilder {
    pub(crate) fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        nonce_provider: Arc<dyn NonceProvider>,
        user_agent: Option<String>,
    ) -> Result<Self, CexError> {
        let user_agent =
            user_agent.unwrap_or_else(|| format!("bot-cex.io-{}", credentials.username));
        let user_agent = HeaderValue::from_str(&user_agent).map_err(|_| {
            CexError::InvalidCredentials(format!(
                "Username cannot be used in a header: {user_agent}"
            ))
        })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            nonce_provider,
            user_agent,
        })
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Assemble a request for `command`.
    ///
    /// Public calls are always GET regardless of `requested`; private calls are
    /// always POST and get a fresh nonce and signature.
    pub(crate) fn build(
        &self,
        command: &str,
        path_args: &[&str],
        mut params: Params,
        visibility: Visibility,
        requested: Method,
    ) -> Result<RequestDescriptor, CexError> {
        params.retain(|_, value| !value.is_null());

        let method = match visibility {
            Visibility::Public => Method::GET,
            Visibility::Private => {
                if requested != Method::POST {
                    tracing::debug!(command, %requested, "private calls are always sent as POST");
                }
                self.authenticate(&mut params)?;
                Method::POST
            }
        };

        let mut url = self.command_url(command, path_args)?;
        let body = if method == Method::GET {
            let query = encode_query(&params)?;
            if !query.is_empty() {
                url.set_query(Some(&query));
            }
            None
        } else {
            Some(
                serde_json::to_string(&params)
                    .map_err(|e| CexError::InvalidParams(format!("Cannot encode body: {e}")))?,
            )
        };

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(RequestDescriptor {
            command: command.to_string(),
            method,
            url,
            headers,
            params,
            body,
            visibility,
        })
    }

    /// Assemble the unauthenticated historical OHLCV request.
    ///
    /// This endpoint sits outside the usual `{command}/` envelope: no trailing
    /// slash, no content type, and a permissive `Accept` header.
    pub(crate) fn historical_ohlcv(
        &self,
        date: &str,
        symbol1: &str,
        symbol2: &str,
    ) -> Result<RequestDescriptor, CexError> {
        for segment in [date, symbol1, symbol2] {
            check_segment(segment)?;
        }
        let raw = format!("{}/{HISTORICAL_OHLCV}/{date}/{symbol1}/{symbol2}", self.base_url);
        let url = Url::parse(&raw)
            .map_err(|e| CexError::InvalidParams(format!("Invalid URL {raw}: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        Ok(RequestDescriptor {
            command: HISTORICAL_OHLCV.to_string(),
            method: Method::GET,
            url,
            headers,
            params: Params::new(),
            body: None,
            visibility: Visibility::Public,
        })
    }

    fn authenticate(&self, params: &mut Params) -> Result<(), CexError> {
        if let Some(field) = AUTH_FIELDS.iter().find(|f| params.contains_key(**f)) {
            return Err(CexError::InvalidParams(format!(
                "Authentication field '{field}' is injected automatically and cannot be supplied"
            )));
        }

        let nonce = self.nonce_provider.next_nonce();
        let signature = sign_request(&self.credentials, nonce)?;
        params.insert("key".into(), Value::String(self.credentials.api_key.clone()));
        params.insert("signature".into(), Value::String(signature));
        params.insert("nonce".into(), Value::String(nonce.to_string()));

        let missing: Vec<&str> = AUTH_FIELDS
            .iter()
            .copied()
            .filter(|f| !params.contains_key(*f))
            .collect();
        if !missing.is_empty() {
            return Err(CexError::InvalidParams(format!(
                "Missing required parameters: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    fn command_url(&self, command: &str, path_args: &[&str]) -> Result<Url, CexError> {
        if command.is_empty() {
            return Err(CexError::InvalidParams("Command cannot be empty".into()));
        }
        for segment in path_args {
            check_segment(segment)?;
        }
        let raw = format!("{}/{command}/{}", self.base_url, path_args.join("/"));
        Url::parse(&raw).map_err(|e| CexError::InvalidParams(format!("Invalid URL {raw}: {e}")))
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

fn check_segment(segment: &str) -> Result<(), CexError> {
    if segment.is_empty() || segment.contains(['/', '?', '#']) {
        return Err(CexError::InvalidParams(format!(
            "Invalid path segment: {segment:?}"
        )));
    }
    Ok(())
}

fn encode_query(params: &Params) -> Result<String, CexError> {
    let mut pairs = Vec::with_capacity(params.len());
    for (name, value) in params {
        let value = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => continue,
            Value::Array(_) | Value::Object(_) => {
                return Err(CexError::InvalidParams(format!(
                    "Parameter '{name}' cannot be encoded in a query string"
                )));
            }
        };
        pairs.push((name.as_str(), value));
    }
    serde_urlencoded::to_string(&pairs).map_err(|e| CexError::InvalidParams(e.to_string()))
}
