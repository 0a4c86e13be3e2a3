//! CEX.IO REST API client.
//!
//! A call flows through four stages:
//! - the request builder assembles URL, headers and parameters, and signs
//!   private calls
//! - the transport sends it with bounded retry
//! - [`classify`] turns the response into a JSON value or a [`CexError`](crate::CexError)
//! - the endpoint facade methods on [`CexRestClient`] wrap all of it per command

mod client;
pub mod endpoints;
mod private;
mod public;
mod request;
mod response;
mod transport;
pub mod types;

pub use client::{CexRestClient, CexRestClientBuilder};
pub use endpoints::{CEXIO_BASE_URL, Endpoint};
pub use private::PRICE_STATS_MAX_POINTS;
pub use public::DEFAULT_ORDER_BOOK_DEPTH;
pub use request::{AUTH_FIELDS, RequestDescriptor};
pub use response::{INVALID_JSON_MESSAGE, classify};
pub use transport::{RETRYABLE_STATUSES, RetryConfig};
pub use types::{Market, OrderSide, Params, Visibility};
