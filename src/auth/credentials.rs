//! Credential management and validation for CEX.IO API authentication.

use secrecy::{ExposeSecret, SecretString};

use crate::error::CexError;

/// Documented length of a CEX.IO API key.
pub const API_KEY_LENGTH: usize = 26;
/// Documented length of a CEX.IO API secret.
pub const API_SECRET_LENGTH: usize = 27;

/// Default minimum accepted length for both key and secret.
pub const DEFAULT_MIN_CREDENTIAL_LEN: usize = 20;

/// API credentials: account username, key and secret.
#[derive(Clone)]
pub struct Credentials {
    /// Account username, part of the signed message and the user agent.
    pub username: String,
    /// The API key (public identifier)
    pub api_key: String,
    api_secret: SecretString,
}

impl Credentials {
    /// Create new credentials.
    ///
    /// No validation happens here; the client checks the shape against its
    /// [`CredentialPolicy`] when it is built.
    pub fn new(
        username: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// Read credentials from `CEXIO_USERNAME`, `CEXIO_API_KEY` and `CEXIO_API_SECRET`.
    ///
    /// Returns `None` if any of them is not set.
    pub fn try_from_env() -> Option<Self> {
        Self::try_from_env_vars("CEXIO_USERNAME", "CEXIO_API_KEY", "CEXIO_API_SECRET")
    }

    /// Read credentials from custom environment variable names.
    pub fn try_from_env_vars(username_var: &str, key_var: &str, secret_var: &str) -> Option<Self> {
        let username = std::env::var(username_var).ok()?;
        let api_key = std::env::var(key_var).ok()?;
        let api_secret = std::env::var(secret_var).ok()?;
        Some(Self::new(username, api_key, api_secret))
    }

    /// Get the API secret for signing.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Minimum lengths enforced on the key and secret.
///
/// The floor is deliberately below the documented lengths
/// ([`API_KEY_LENGTH`], [`API_SECRET_LENGTH`]) so a change in the provider's
/// key format does not lock users out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialPolicy {
    pub min_key_len: usize,
    pub min_secret_len: usize,
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self {
            min_key_len: DEFAULT_MIN_CREDENTIAL_LEN,
            min_secret_len: DEFAULT_MIN_CREDENTIAL_LEN,
        }
    }
}

impl CredentialPolicy {
    /// Validate credentials against this policy.
    pub fn check(&self, credentials: &Credentials) -> Result<(), CexError> {
        validate_credentials(&credentials.api_key, credentials.expose_secret(), self)
    }
}

/// Check that an API key and secret are non-empty and at least as long as the policy floor.
pub fn validate_credentials(
    api_key: &str,
    api_secret: &str,
    policy: &CredentialPolicy,
) -> Result<(), CexError> {
    if api_key.is_empty() || api_secret.is_empty() {
        return Err(CexError::InvalidCredentials(
            "API key and secret cannot be empty".to_string(),
        ));
    }
    if api_key.chars().count() < policy.min_key_len
        || api_secret.chars().count() < policy.min_secret_len
    {
        return Err(CexError::InvalidCredentials(format!(
            "API key or secret is too short (minimum {} / {} characters)",
            policy.min_key_len, policy.min_secret_len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_of(len: usize) -> String {
        "k".repeat(len)
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::new("trader", "my_key", "super_secret");
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("my_key"));
        assert!(debug_str.contains("trader"));
        assert!(!debug_str.contains("super_secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let policy = CredentialPolicy::default();
        assert!(matches!(
            validate_credentials("", &key_of(27), &policy),
            Err(CexError::InvalidCredentials(_))
        ));
        assert!(matches!(
            validate_credentials(&key_of(26), "", &policy),
            Err(CexError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_floor_is_inclusive() {
        let policy = CredentialPolicy::default();
        for len in 1..DEFAULT_MIN_CREDENTIAL_LEN {
            assert!(validate_credentials(&key_of(len), &key_of(27), &policy).is_err());
            assert!(validate_credentials(&key_of(26), &key_of(len), &policy).is_err());
        }
        for len in DEFAULT_MIN_CREDENTIAL_LEN..40 {
            assert!(validate_credentials(&key_of(len), &key_of(len), &policy).is_ok());
        }
    }

    #[test]
    fn test_documented_lengths_pass() {
        let creds = Credentials::new("trader", key_of(API_KEY_LENGTH), key_of(API_SECRET_LENGTH));
        assert!(CredentialPolicy::default().check(&creds).is_ok());
    }

    #[test]
    fn test_custom_floor() {
        let policy = CredentialPolicy {
            min_key_len: 4,
            min_secret_len: 8,
        };
        assert!(validate_credentials("abcd", "12345678", &policy).is_ok());
        assert!(validate_credentials("abcd", "1234567", &policy).is_err());
    }
}
