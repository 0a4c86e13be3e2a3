//! CEX.IO REST API endpoint descriptors.

use serde_json::Value;

use crate::error::CexError;
use crate::rest::types::{Params, Visibility};

/// Base URL for the CEX.IO REST API.
pub const CEXIO_BASE_URL: &str = "https://cex.io/api";

/// Path of the historical OHLCV endpoint, relative to the base URL.
pub const HISTORICAL_OHLCV: &str = "ohlcv/hd";

/// Static description of one API command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Command name, the first path segment after the base URL.
    pub command: &'static str,
    pub visibility: Visibility,
    /// Minimum number of path segments after the command.
    pub min_segments: usize,
    /// Maximum number of path segments, `None` for unbounded.
    pub max_segments: Option<usize>,
    /// Parameters that must be present and non-null.
    pub required: &'static [&'static str],
}

impl Endpoint {
    const fn new(command: &'static str, visibility: Visibility) -> Self {
        Self {
            command,
            visibility,
            min_segments: 0,
            max_segments: Some(0),
            required: &[],
        }
    }

    const fn segments(mut self, min: usize, max: Option<usize>) -> Self {
        self.min_segments = min;
        self.max_segments = max;
        self
    }

    const fn pair(self) -> Self {
        self.segments(2, Some(2))
    }

    const fn required(mut self, required: &'static [&'static str]) -> Self {
        self.required = required;
        self
    }

    /// Check path arity and required parameters before anything is sent.
    pub fn validate(&self, path_args: &[&str], params: &Params) -> Result<(), CexError> {
        let count = path_args.len();
        let too_many = self.max_segments.is_some_and(|max| count > max);
        if count < self.min_segments || too_many {
            return Err(CexError::InvalidParams(format!(
                "{} expects {} path segments, got {count}",
                self.command,
                self.arity()
            )));
        }

        let missing: Vec<&str> = self
            .required
            .iter()
            .copied()
            .filter(|name| matches!(params.get(*name), None | Some(Value::Null)))
            .collect();
        if !missing.is_empty() {
            return Err(CexError::InvalidParams(format!(
                "Missing required parameters for {}: {}",
                self.command,
                missing.join(", ")
            )));
        }
        Ok(())
    }

    fn arity(&self) -> String {
        match self.max_segments {
            Some(max) if max == self.min_segments => max.to_string(),
            Some(max) => format!("{}..={max}", self.min_segments),
            None => format!("at least {}", self.min_segments),
        }
    }
}

/// Public endpoints (no authentication required).
pub mod public {
    use super::Endpoint;
    use crate::rest::types::Visibility::Public;

    pub const CURRENCY_LIMITS: Endpoint = Endpoint::new("currency_limits", Public);
    pub const TICKER: Endpoint = Endpoint::new("ticker", Public).pair();
    /// Tickers for every pair quoted in any of the given currencies.
    pub const TICKERS: Endpoint = Endpoint::new("tickers", Public).segments(1, None);
    pub const LAST_PRICE: Endpoint = Endpoint::new("last_price", Public).pair();
    pub const LAST_PRICES: Endpoint = Endpoint::new("last_prices", Public).segments(1, None);
    pub const ORDER_BOOK: Endpoint = Endpoint::new("order_book", Public).pair();
    pub const TRADE_HISTORY: Endpoint = Endpoint::new("trade_history", Public)
        .pair()
        .required(&["since"]);
}

/// Private endpoints (authentication required).
pub mod private {
    use super::Endpoint;
    use crate::rest::types::Visibility::Private;

    // Account
    pub const BALANCE: Endpoint = Endpoint::new("balance", Private);
    pub const MY_FEE: Endpoint = Endpoint::new("get_myfee", Private);
    pub const CURRENCY_PROFILE: Endpoint = Endpoint::new("currency_profile", Private);
    pub const GET_ADDRESS: Endpoint = Endpoint::new("get_address", Private).required(&["currency"]);
    pub const GET_CRYPTO_ADDRESS: Endpoint =
        Endpoint::new("get_crypto_address", Private).required(&["currency"]);

    // Orders
    pub const OPEN_ORDERS: Endpoint = Endpoint::new("open_orders", Private).segments(0, Some(2));
    pub const ACTIVE_ORDERS_STATUS: Endpoint =
        Endpoint::new("active_orders_status", Private).required(&["orders_list"]);
    pub const ARCHIVED_ORDERS: Endpoint = Endpoint::new("archived_orders", Private).pair();
    pub const GET_ORDER: Endpoint = Endpoint::new("get_order", Private).required(&["id"]);
    pub const GET_ORDER_TX: Endpoint = Endpoint::new("get_order_tx", Private).required(&["id"]);

    // Trading
    pub const PLACE_ORDER: Endpoint = Endpoint::new("place_order", Private)
        .pair()
        .required(&["type", "amount", "price"]);
    pub const CANCEL_ORDER: Endpoint = Endpoint::new("cancel_order", Private).required(&["id"]);
    pub const CANCEL_ORDERS: Endpoint = Endpoint::new("cancel_orders", Private).pair();
    pub const CANCEL_REPLACE_ORDER: Endpoint = Endpoint::new("cancel_replace_order", Private)
        .pair()
        .required(&["type", "amount", "price", "order_id"]);
    pub const MASS_CANCEL_PLACE_ORDERS: Endpoint =
        Endpoint::new("mass_cancel_place_orders", Private)
            .required(&["cancel-orders", "place-orders"]);
    pub const CONVERT: Endpoint = Endpoint::new("convert", Private).pair().required(&["amnt"]);
    pub const PRICE_STATS: Endpoint = Endpoint::new("price_stats", Private)
        .pair()
        .required(&["maxRespArrSize"]);
}
