//! Example: Fetching public market data from CEX.IO.
//!
//! The client always needs credentials, but these calls are unsigned GETs.
//!
//! Run with: cargo run --example public_data

use cexio_api_client::auth::Credentials;
use cexio_api_client::{CexRestClient, Market};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let _ = dotenv::dotenv();

    let credentials = match Credentials::try_from_env() {
        Some(creds) => creds,
        None => {
            println!("Set CEXIO_USERNAME, CEXIO_API_KEY and CEXIO_API_SECRET to run this example.");
            return Ok(());
        }
    };
    let client = CexRestClient::builder(credentials).build()?;
    let market = Market::default();

    println!("=== Ticker ({market}) ===");
    let ticker = client.get_ticker(&market).await?;
    println!("Last: {}, bid: {}, ask: {}", ticker["last"], ticker["bid"], ticker["ask"]);

    println!("\n=== Last Prices (USD, EUR) ===");
    let prices = client.get_last_prices(&["USD", "EUR"]).await?;
    if let Some(data) = prices["data"].as_array() {
        for entry in data.iter().take(5) {
            println!("{}/{}: {}", entry["symbol1"], entry["symbol2"], entry["lprice"]);
        }
    }

    println!("\n=== Order Book (depth 5) ===");
    let book = client.get_order_book(&market, Some(5)).await?;
    println!("Bids: {}", book["bids"]);
    println!("Asks: {}", book["asks"]);

    println!("\n=== Historical OHLCV (yesterday) ===");
    let yesterday = time::OffsetDateTime::now_utc().date().previous_day();
    if let Some(date) = yesterday {
        let ohlcv = client.historical_ohlcv(date, &market).await?;
        println!("Day: {}", ohlcv["time"]);
    }

    client.close();
    Ok(())
}
