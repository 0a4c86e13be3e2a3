use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cexio_api_client::auth::Credentials;
use cexio_api_client::error::{CexError, NetworkError};
use cexio_api_client::rest::RetryConfig;
use cexio_api_client::{CexRestClient, Market, OrderSide};

fn credentials() -> Credentials {
    Credentials::new(
        "up123456789",
        "HZxKnE4ua8cTr2JdLq7Mw5Ys",
        "Q2Fg8dR4kLm9Zx7Tp3Wv5Ys1Nb6",
    )
}

fn build_client(base_url: &str, retry: RetryConfig) -> CexRestClient {
    CexRestClient::builder(credentials())
        .base_url(base_url)
        .retry_config(retry)
        .build()
        .unwrap()
}

fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        backoff_factor: Duration::from_millis(10),
        max_backoff: Duration::from_secs(1),
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_503_retried_then_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ticker/BTC/USD"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;

    let client = build_client(&format!("{}/api", server.uri()), fast_retry(3));
    let started = Instant::now();
    let err = client.get_ticker(&Market::default()).await.unwrap_err();

    match err {
        CexError::Network(NetworkError::RetriesExhausted {
            status, attempts, ..
        }) => {
            assert_eq!(status, 503);
            assert_eq!(attempts, 4);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // 10ms + 20ms + 40ms of backoff
    assert!(started.elapsed() >= Duration::from_millis(70));
}

#[tokio::test]
async fn test_transient_status_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/last_price/BTC/USD"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/last_price/BTC/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lprice": "42000.5"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&format!("{}/api", server.uri()), fast_retry(3));
    let price = client.get_last_price(&Market::default()).await.unwrap();
    assert_eq!(price["lprice"], "42000.5");
}

#[tokio::test]
async fn test_rate_limit_status_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/balance/"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let client = build_client(&format!("{}/api", server.uri()), fast_retry(1));
    let err = client.get_balance().await.unwrap_err();
    assert!(matches!(
        err,
        CexError::Network(NetworkError::RetriesExhausted { status: 429, .. })
    ));
}

#[tokio::test]
async fn test_writes_are_retried_without_deduplication() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/place_order/BTC/USD"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/place_order/BTC/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&format!("{}/api", server.uri()), fast_retry(3));
    let order = client
        .place_order(
            &Market::default(),
            OrderSide::Buy,
            "0.01".parse().unwrap(),
            "42000".parse().unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(order["id"], "1");

    // Both attempts carried the same signed body.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);
}

#[tokio::test]
async fn test_not_implemented_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ticker/BTC/USD"))
        .respond_with(ResponseTemplate::new(501).set_body_string("nope"))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&format!("{}/api", server.uri()), fast_retry(3));
    let err = client.get_ticker(&Market::default()).await.unwrap_err();
    assert_eq!(err.as_api().unwrap().status_code, 501);
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ticker/BTC/USD"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"last": "1"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let retry = RetryConfig {
        timeout: Duration::from_millis(50),
        ..fast_retry(0)
    };
    let client = build_client(&format!("{}/api", server.uri()), retry);
    let err = client.get_ticker(&Market::default()).await.unwrap_err();
    match err {
        CexError::Network(inner) => assert!(inner.is_timeout(), "unexpected: {inner:?}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_after_retries_is_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ticker/BTC/USD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .expect(2)
        .mount(&server)
        .await;

    let retry = RetryConfig {
        timeout: Duration::from_millis(50),
        ..fast_retry(1)
    };
    let client = build_client(&format!("{}/api", server.uri()), retry);
    let err = client.get_ticker(&Market::default()).await.unwrap_err();
    match err {
        CexError::Network(inner) => assert!(inner.is_timeout(), "unexpected: {inner:?}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Bind and drop a listener to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = build_client(&format!("http://127.0.0.1:{port}/api"), fast_retry(1));
    let err = client.get_ticker(&Market::default()).await.unwrap_err();
    assert!(matches!(
        err,
        CexError::Network(NetworkError::Request { .. })
    ));
}
