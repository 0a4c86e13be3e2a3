//! Authentication module for the CEX.IO API.
//!
//! This module provides:
//! - Credential storage and shape validation
//! - Nonce generation for replay attack prevention
//! - HMAC-SHA256 signature generation for private requests

mod credentials;
mod nonce;
mod signature;

pub use credentials::{
    API_KEY_LENGTH, API_SECRET_LENGTH, CredentialPolicy, Credentials, DEFAULT_MIN_CREDENTIAL_LEN,
    validate_credentials,
};
pub use nonce::{MillisecondNonce, NonceProvider};
pub use signature::{sign, sign_request};
