//! Error types for the CEX.IO client library.

use serde_json::Value;
use thiserror::Error;

/// The main error type for all CEX.IO client operations.
#[derive(Error, Debug)]
pub enum CexError {
    /// Transport-level failure: timeout, connection failure, or retries exhausted.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// API key or secret is malformed.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The exchange rejected the request or returned malformed data.
    #[error("{0}")]
    Api(ApiResponseError),

    /// Request parameters failed validation before dispatch.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

impl CexError {
    /// Returns the API error if this is an exchange-side rejection.
    pub fn as_api(&self) -> Option<&ApiResponseError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiResponseError> for CexError {
    fn from(err: ApiResponseError) -> Self {
        Self::Api(err)
    }
}

/// Failures raised by the HTTP transport.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// The request did not complete within the configured timeout.
    #[error("Request to {command} timed out")]
    Timeout {
        /// Command that was being called.
        command: String,
    },

    /// The server kept answering with a retryable status until retries ran out.
    #[error("Request to {command} failed after {attempts} attempts with HTTP {status}")]
    RetriesExhausted {
        /// Command that was being called.
        command: String,
        /// Last HTTP status seen.
        status: u16,
        /// Total number of attempts made.
        attempts: u32,
    },

    /// Connection, TLS, or body read failure.
    #[error("Request to {command} failed: {message}")]
    Request {
        /// Command that was being called.
        command: String,
        /// Underlying cause.
        message: String,
    },
}

impl NetworkError {
    /// Check if this error was caused by a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub(crate) fn from_middleware(command: &str, err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => Self::from_reqwest(command, e),
            // The retry middleware wraps the last failure once it has retried.
            reqwest_middleware::Error::Middleware(e) => {
                let timed_out = e.chain().any(|cause| {
                    cause
                        .downcast_ref::<reqwest::Error>()
                        .is_some_and(reqwest::Error::is_timeout)
                        || cause
                            .downcast_ref::<reqwest_middleware::Error>()
                            .is_some_and(|inner| match inner {
                                reqwest_middleware::Error::Reqwest(r) => r.is_timeout(),
                                _ => false,
                            })
                });
                if timed_out {
                    Self::Timeout {
                        command: command.to_string(),
                    }
                } else {
                    Self::Request {
                        command: command.to_string(),
                        message: format!("{e:#}"),
                    }
                }
            }
        }
    }

    pub(crate) fn from_reqwest(command: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                command: command.to_string(),
            }
        } else {
            Self::Request {
                command: command.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Response body attached to an [`ApiResponseError`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The body parsed as JSON.
    Json(Value),
    /// The body as raw text when it was not valid JSON.
    Text(String),
}

/// An error returned by the CEX.IO API itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponseError {
    /// HTTP status code of the response.
    pub status_code: u16,
    /// The `error` field from the body, or the raw body text.
    pub message: String,
    /// Parsed body or raw text, if any.
    pub body: Option<ResponseBody>,
}

impl std::fmt::Display for ApiResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "API returned status code {}: {}",
            self.status_code, self.message
        )
    }
}

impl std::error::Error for ApiResponseError {}

impl ApiResponseError {
    /// Create a new API error.
    pub fn new(status_code: u16, message: impl Into<String>, body: Option<ResponseBody>) -> Self {
        Self {
            status_code,
            message: message.into(),
            body,
        }
    }

    /// Build an error from a status code and raw response text.
    ///
    /// The message is taken from the top-level `error` field when the body is
    /// a JSON object carrying one, otherwise the raw text is used.
    pub fn from_body(status_code: u16, text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(json) => {
                let message = match json.get("error") {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => text.to_string(),
                };
                Self::new(status_code, message, Some(ResponseBody::Json(json)))
            }
            Err(_) => Self::new(status_code, text, Some(ResponseBody::Text(text.to_string()))),
        }
    }

    /// Check if the exchange reported insufficient funds.
    pub fn is_insufficient_funds(&self) -> bool {
        self.message_contains("insufficient funds")
    }

    /// Check if the exchange rejected the nonce.
    pub fn is_invalid_nonce(&self) -> bool {
        self.message_contains("nonce")
    }

    /// Check if the exchange rejected the signature or key.
    pub fn is_auth_rejected(&self) -> bool {
        self.message_contains("signature") || self.message_contains("api key")
    }

    /// Check if this is a rate limit rejection.
    pub fn is_rate_limit(&self) -> bool {
        self.status_code == 429 || self.message_contains("rate limit")
    }

    fn message_contains(&self, needle: &str) -> bool {
        self.message.to_ascii_lowercase().contains(needle)
    }
}

/// Known CEX.IO error messages for pattern matching.
pub mod error_messages {
    pub const NO_ACTIVE_ORDERS: &str = "no active orders";
    pub const INSUFFICIENT_FUNDS: &str = "Error: Place order error: Insufficient funds.";
    pub const INVALID_NONCE: &str = "Nonce must be incremented";
    pub const INVALID_SIGNATURE: &str = "Invalid signature";
    pub const INVALID_API_KEY: &str = "Invalid API key";
    pub const PERMISSION_DENIED: &str = "Permission denied";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_json_body() {
        let error = ApiResponseError::from_body(400, r#"{"error":"Invalid API key"}"#);
        assert_eq!(error.status_code, 400);
        assert_eq!(error.message, error_messages::INVALID_API_KEY);
        assert!(error.is_auth_rejected());
        assert!(matches!(error.body, Some(ResponseBody::Json(_))));
    }

    #[test]
    fn test_api_error_from_text_body() {
        let error = ApiResponseError::from_body(502, "Bad Gateway");
        assert_eq!(error.message, "Bad Gateway");
        assert_eq!(error.body, Some(ResponseBody::Text("Bad Gateway".into())));
    }

    #[test]
    fn test_api_error_json_without_error_field() {
        let error = ApiResponseError::from_body(404, r#"{"ok":"no"}"#);
        assert_eq!(error.message, r#"{"ok":"no"}"#);
    }

    #[test]
    fn test_api_error_display() {
        let error = ApiResponseError::new(200, "no active orders", None);
        assert_eq!(
            error.to_string(),
            "API returned status code 200: no active orders"
        );
        assert_eq!(
            CexError::from(error).to_string(),
            "API returned status code 200: no active orders"
        );
    }

    #[test]
    fn test_message_helpers() {
        assert!(
            ApiResponseError::new(200, error_messages::INSUFFICIENT_FUNDS, None)
                .is_insufficient_funds()
        );
        assert!(ApiResponseError::new(200, error_messages::INVALID_NONCE, None).is_invalid_nonce());
        assert!(ApiResponseError::new(429, "slow down", None).is_rate_limit());
    }
}
