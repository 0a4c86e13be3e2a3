use cexio_api_client::auth::Credentials;
use cexio_api_client::{CexRestClient, Market};

fn live_tests_enabled() -> bool {
    std::env::var("CEXIO_LIVE_TESTS").ok().as_deref() == Some("1")
}

#[tokio::test]
#[ignore]
async fn live_public_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let credentials = match Credentials::try_from_env() {
        Some(creds) => creds,
        None => return Ok(()),
    };
    let client = CexRestClient::builder(credentials).build()?;

    let ticker = client.get_ticker(&Market::default()).await?;
    assert!(ticker.get("last").is_some());

    Ok(())
}

#[tokio::test]
#[ignore]
async fn live_private_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let credentials = match Credentials::try_from_env() {
        Some(creds) => creds,
        None => return Ok(()),
    };
    let client = CexRestClient::builder(credentials).build()?;

    let balance = client.get_balance().await?;
    assert!(balance.get("timestamp").is_some());
    let _fee = client.get_my_fee().await?;

    client.close();
    Ok(())
}
