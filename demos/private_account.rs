//! Example: Private account endpoints.
//!
//! Run with: cargo run --example private_account

use std::time::Duration;

use cexio_api_client::auth::Credentials;
use cexio_api_client::error::error_messages;
use cexio_api_client::{CexError, CexRestClient, Market};
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

    let client = CexRestClient::builder(credentials)
        .user_agent("cexio-api-client-examples/private_account")
        .max_retries(2)
        .timeout(Duration::from_secs(10))
        .build()?;

    println!("=== Balance ===");
    let balance = client.get_balance().await?;
    for currency in ["BTC", "ETH", "USD"] {
        println!("{currency}: {}", balance[currency]["available"]);
    }

    println!("\n=== Fees ===");
    let fees = client.get_my_fee().await?;
    println!("{fees}");

    println!("\n=== Open Orders (BTC/USD) ===");
    let market = Market::default();
    match client.get_open_orders(&market.segments()).await {
        Ok(orders) => println!("{orders}"),
        Err(CexError::Api(err)) if err.message == error_messages::NO_ACTIVE_ORDERS => {
            println!("No open orders");
        }
        Err(err) => return Err(err.into()),
    }

    println!("\n=== BTC Deposit Address ===");
    let address = client.get_crypto_address("BTC").await?;
    println!("{}", address["data"]);

    client.close();
    Ok(())
}
