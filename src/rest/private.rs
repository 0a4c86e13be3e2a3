//! Private account and trading endpoints (authentication required).
//!
//! Every call here is a signed POST. Transport retries apply to these calls
//! too, so an order placement can be delivered more than once if the first
//! attempt reached the exchange but its response was lost.

use rust_decimal::Decimal;
use serde_json::{Value, json};

use crate::error::CexError;
use crate::rest::CexRestClient;
use crate::rest::endpoints::private;
use crate::rest::public::object;
use crate::rest::types::{Market, OrderSide, Params};

/// Maximum number of points requested from `price_stats`.
pub const PRICE_STATS_MAX_POINTS: u32 = 100;

impl CexRestClient {
    /// Get account balances.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use cexio_api_client::CexRestClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = CexRestClient::new("up123456789", "your_api_key_here_xxxxxx", "your_api_secret_here_xxxxxx")?;
    ///     let balance = client.get_balance().await?;
    ///     println!("BTC available: {}", balance["BTC"]["available"]);
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_balance(&self) -> Result<Value, CexError> {
        self.call(&private::BALANCE, &[], Params::new()).await
    }

    /// Get open orders, optionally filtered by one or two symbols.
    pub async fn get_open_orders(&self, symbols: &[&str]) -> Result<Value, CexError> {
        self.call(&private::OPEN_ORDERS, symbols, Params::new())
            .await
    }

    /// Get open orders for a pair given as a single `SYMBOL1:SYMBOL2` field.
    pub async fn get_open_orders_by_pair(&self, pair: &str) -> Result<Value, CexError> {
        let params = object(json!({ "pair": pair }));
        self.call(&private::OPEN_ORDERS, &[], params).await
    }

    /// Get open orders involving one symbol.
    pub async fn get_open_orders_by_symbol(&self, symbol: &str) -> Result<Value, CexError> {
        let params = object(json!({ "symbol": symbol }));
        self.call(&private::OPEN_ORDERS, &[], params).await
    }

    /// Get the status of the given active orders.
    pub async fn get_active_orders_status(&self, order_ids: &[&str]) -> Result<Value, CexError> {
        let params = object(json!({ "orders_list": order_ids }));
        self.call(&private::ACTIVE_ORDERS_STATUS, &[], params).await
    }

    /// Get archived orders for a pair.
    pub async fn get_archived_orders(&self, market: &Market) -> Result<Value, CexError> {
        self.call(&private::ARCHIVED_ORDERS, &market.segments(), Params::new())
            .await
    }

    /// Cancel one order.
    pub async fn cancel_order(&self, order_id: &str) -> Result<Value, CexError> {
        let params = object(json!({ "id": order_id }));
        self.call(&private::CANCEL_ORDER, &[], params).await
    }

    /// Cancel all orders for a pair.
    pub async fn cancel_orders(&self, market: &Market) -> Result<Value, CexError> {
        self.call(&private::CANCEL_ORDERS, &market.segments(), Params::new())
            .await
    }

    /// Place a limit order.
    pub async fn place_order(
        &self,
        market: &Market,
        side: OrderSide,
        amount: Decimal,
        price: Decimal,
    ) -> Result<Value, CexError> {
        let params = object(json!({
            "type": side,
            "amount": amount.to_string(),
            "price": price.to_string(),
        }));
        self.call(&private::PLACE_ORDER, &market.segments(), params)
            .await
    }

    /// Cancel an order and place a replacement in one request.
    pub async fn cancel_replace_order(
        &self,
        market: &Market,
        side: OrderSide,
        amount: Decimal,
        price: Decimal,
        order_id: &str,
    ) -> Result<Value, CexError> {
        let params = object(json!({
            "symbol1": market.symbol1,
            "symbol2": market.symbol2,
            "type": side,
            "amount": amount.to_string(),
            "price": price.to_string(),
            "order_id": order_id,
        }));
        self.call(&private::CANCEL_REPLACE_ORDER, &market.segments(), params)
            .await
    }

    /// Cancel and place several orders in one request.
    ///
    /// Each entry of `place_orders` is an order object as the exchange expects
    /// it. With `cancel_placed_if_place_failed` set, orders placed by this
    /// request are cancelled again if any placement fails.
    pub async fn mass_cancel_place_orders(
        &self,
        cancel_order_ids: &[&str],
        place_orders: &[Value],
        cancel_placed_if_place_failed: bool,
    ) -> Result<Value, CexError> {
        let params = object(json!({
            "cancel-orders": cancel_order_ids,
            "place-orders": place_orders,
            "cancelPlacedOrdersIfPlaceFailed": cancel_placed_if_place_failed,
        }));
        self.call(&private::MASS_CANCEL_PLACE_ORDERS, &[], params)
            .await
    }

    /// Get details of one order.
    pub async fn get_order_details(&self, order_id: &str) -> Result<Value, CexError> {
        let params = object(json!({ "id": order_id }));
        self.call(&private::GET_ORDER, &[], params).await
    }

    /// Get the transactions of one order.
    pub async fn get_order_transactions(&self, order_id: &str) -> Result<Value, CexError> {
        let params = object(json!({ "id": order_id }));
        self.call(&private::GET_ORDER_TX, &[], params).await
    }

    /// Get the deposit address for a currency.
    pub async fn get_crypto_address(&self, currency: &str) -> Result<Value, CexError> {
        let params = object(json!({ "currency": currency }));
        self.call(&private::GET_ADDRESS, &[], params).await
    }

    /// Get all deposit addresses for a currency, one per supported network.
    pub async fn get_all_crypto_addresses(&self, currency: &str) -> Result<Value, CexError> {
        let params = object(json!({ "currency": currency }));
        self.call(&private::GET_CRYPTO_ADDRESS, &[], params).await
    }

    /// Get the account's trading fees.
    pub async fn get_my_fee(&self) -> Result<Value, CexError> {
        self.call(&private::MY_FEE, &[], Params::new()).await
    }

    /// Get the account's currency profile.
    pub async fn get_currency_profile(&self) -> Result<Value, CexError> {
        self.call(&private::CURRENCY_PROFILE, &[], Params::new())
            .await
    }

    /// Quote a conversion of `amount` of `symbol1` into `symbol2`.
    pub async fn convert(&self, market: &Market, amount: Decimal) -> Result<Value, CexError> {
        let params = object(json!({ "amnt": amount.to_string() }));
        self.call(&private::CONVERT, &market.segments(), params)
            .await
    }

    /// Get price statistics, optionally limited to the last `last_hours`.
    pub async fn get_price_stats(
        &self,
        market: &Market,
        last_hours: Option<u32>,
    ) -> Result<Value, CexError> {
        let params = object(json!({
            "lastHours": last_hours,
            "maxRespArrSize": PRICE_STATS_MAX_POINTS,
        }));
        self.call(&private::PRICE_STATS, &market.segments(), params)
            .await
    }
}
