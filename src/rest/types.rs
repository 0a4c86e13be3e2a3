//! Common types shared by the request pipeline and the endpoint facade.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request parameters, encoded as a query string for GET and a JSON body for POST.
pub type Params = Map<String, Value>;

/// Whether a call needs authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Unauthenticated market data, always sent as GET.
    Public,
    /// Authenticated account call, always sent as POST.
    Private,
}

impl Visibility {
    pub fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}

/// A currency pair such as `BTC/USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Market {
    pub symbol1: String,
    pub symbol2: String,
}

impl Market {
    pub fn new(symbol1: impl Into<String>, symbol2: impl Into<String>) -> Self {
        Self {
            symbol1: symbol1.into(),
            symbol2: symbol2.into(),
        }
    }

    /// The pair as URL path segments.
    pub fn segments(&self) -> [&str; 2] {
        [&self.symbol1, &self.symbol2]
    }
}

impl Default for Market {
    fn default() -> Self {
        Self::new("BTC", "USD")
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.symbol1, self.symbol2)
    }
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
