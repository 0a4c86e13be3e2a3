//! # CEX.IO Client
//!
//! An async Rust client library for the CEX.IO exchange REST API.
//!
//! ## Features
//!
//! - Public market data and private trading endpoints
//! - HMAC-SHA256 request signing with strictly increasing nonces
//! - Automatic retries with exponential backoff on transient failures
//! - Typed errors separating network, credential, parameter and API failures
//! - Exact JSON payloads: numbers are never coerced
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cexio_api_client::{CexRestClient, Market};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CexRestClient::new("up123456789", "your_api_key_here_xxxxxx", "your_api_secret_here_xxxxxx")?;
//!     let price = client.get_last_price(&Market::default()).await?;
//!     println!("Last price: {}", price["lprice"]);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rest;

// Re-export commonly used types at crate root
pub use error::{ApiResponseError, CexError, NetworkError, ResponseBody};
pub use rest::{CexRestClient, Market, OrderSide};

/// Result type alias using CexError
pub type Result<T> = std::result::Result<T, CexError>;
