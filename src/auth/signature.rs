//! HMAC-SHA256 signature generation for CEX.IO API authentication.
//!
//! Private endpoints require a signature computed as:
//! ```text
//! UPPER(HEX(HMAC-SHA256(nonce + username + api_key, api_secret)))
//! ```
//!
//! The signature is sent in the `signature` body field alongside `key` and `nonce`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::auth::Credentials;
use crate::error::CexError;

type HmacSha256 = Hmac<Sha256>;

/// Sign a nonce with the given account identity.
///
/// # Example
///
/// ```rust
/// use cexio_api_client::auth::sign;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let signature = sign(1700000000000, "up123456789", "api_key", "api_secret")?;
/// assert_eq!(signature.len(), 64);
/// # Ok(())
/// # }
/// ```
pub fn sign(
    nonce: u64,
    username: &str,
    api_key: &str,
    api_secret: &str,
) -> Result<String, CexError> {
    let mut hmac = HmacSha256::new_from_slice(api_secret.as_bytes())
        .map_err(|e| CexError::InvalidCredentials(format!("Invalid HMAC key: {e}")))?;
    hmac.update(nonce.to_string().as_bytes());
    hmac.update(username.as_bytes());
    hmac.update(api_key.as_bytes());

    Ok(hex::encode_upper(hmac.finalize().into_bytes()))
}

/// Sign a nonce with stored credentials.
pub fn sign_request(credentials: &Credentials, nonce: u64) -> Result<String, CexError> {
    sign(
        nonce,
        &credentials.username,
        &credentials.api_key,
        credentials.expose_secret(),
    )
}
