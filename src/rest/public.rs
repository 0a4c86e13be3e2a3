//! Public market-data endpoints (no authentication required).

use serde_json::{Value, json};
use time::Date;
use time::macros::format_description;

use crate::error::CexError;
use crate::rest::CexRestClient;
use crate::rest::endpoints::public;
use crate::rest::types::{Market, Params};

/// Default order book depth.
pub const DEFAULT_ORDER_BOOK_DEPTH: u32 = 10;

impl CexRestClient {
    /// Get trading limits for every currency pair.
    pub async fn get_currency_limits(&self) -> Result<Value, CexError> {
        self.call(&public::CURRENCY_LIMITS, &[], Params::new())
            .await
    }

    /// Get the ticker for one pair.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use cexio_api_client::{CexRestClient, Market};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = CexRestClient::new("up123456789", "your_api_key_here_xxxxxx", "your_api_secret_here_xxxxxx")?;
    ///     let ticker = client.get_ticker(&Market::new("ETH", "EUR")).await?;
    ///     println!("Last: {}", ticker["last"]);
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_ticker(&self, market: &Market) -> Result<Value, CexError> {
        self.call(&public::TICKER, &market.segments(), Params::new())
            .await
    }

    /// Get tickers for all pairs quoted in any of `currencies`.
    pub async fn get_tickers(&self, currencies: &[&str]) -> Result<Value, CexError> {
        self.call(&public::TICKERS, currencies, Params::new()).await
    }

    /// Get the last trade price for one pair.
    pub async fn get_last_price(&self, market: &Market) -> Result<Value, CexError> {
        self.call(&public::LAST_PRICE, &market.segments(), Params::new())
            .await
    }

    /// Get last prices for all pairs quoted in any of `currencies`.
    pub async fn get_last_prices(&self, currencies: &[&str]) -> Result<Value, CexError> {
        self.call(&public::LAST_PRICES, currencies, Params::new())
            .await
    }

    /// Get the order book, [`DEFAULT_ORDER_BOOK_DEPTH`] levels unless `depth` is given.
    pub async fn get_order_book(
        &self,
        market: &Market,
        depth: Option<u32>,
    ) -> Result<Value, CexError> {
        let params = object(json!({ "depth": depth.unwrap_or(DEFAULT_ORDER_BOOK_DEPTH) }));
        self.call(&public::ORDER_BOOK, &market.segments(), params)
            .await
    }

    /// Get trades since the given trade id.
    pub async fn get_trade_history(&self, market: &Market, since: u64) -> Result<Value, CexError> {
        let params = object(json!({ "since": since }));
        self.call(&public::TRADE_HISTORY, &market.segments(), params)
            .await
    }

    /// Get historical 1m/1h/1d OHLCV data for one day.
    ///
    /// This endpoint is unauthenticated and bypasses the usual command
    /// envelope; errors are classified like any other call.
    pub async fn historical_ohlcv(&self, date: Date, market: &Market) -> Result<Value, CexError> {
        let date = date
            .format(format_description!("[year][month][day]"))
            .map_err(|e| CexError::InvalidParams(format!("Cannot format date: {e}")))?;
        let request = self
            .requests()
            .historical_ohlcv(&date, &market.symbol1, &market.symbol2)?;
        tracing::info!(command = %request.command, %date, %market, "fetching historical OHLCV");
        self.execute(&request).await
    }
}

pub(crate) fn object(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}
