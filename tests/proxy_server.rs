//! End-to-end tests: real listener, real upstream socket, graceful shutdown.

use std::time::Duration;

use serde_json::{json, Value};
use sideshift_client::{ProxyConfig, ProxyServer, Shutdown, SideshiftClient};
use tokio::net::TcpListener;

mod common;

#[tokio::test]
async fn test_proxy_round_trip_and_shutdown() {
    let upstream = common::start_mock_backend(200, r#"[{"coin":"XAI"}]"#).await;

    let client_config = common::fast_config(upstream.base_url(), 1);
    let client = SideshiftClient::new(client_config.clone()).unwrap();
    let config = ProxyConfig {
        client: client_config,
        ..ProxyConfig::default()
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let proxy_addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = ProxyServer::new(config, client, None);
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let http = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    let response = http
        .get(format!("http://{proxy_addr}/coins"))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!([{ "coin": "XAI" }]));

    assert_eq!(shutdown.trigger(), 1);
    let finished = tokio::time::timeout(Duration::from_secs(5), handle).await;
    assert!(matches!(finished, Ok(Ok(Ok(())))), "server did not stop cleanly");
}

#[tokio::test]
async fn test_proxy_maps_upstream_failure() {
    let upstream = common::start_mock_backend(502, r#"{"error":{"message":"bad gateway"}}"#).await;

    let client_config = common::fast_config(upstream.base_url(), 0);
    let client = SideshiftClient::new(client_config.clone()).unwrap();
    let config = ProxyConfig {
        client: client_config,
        ..ProxyConfig::default()
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let proxy_addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = ProxyServer::new(config, client, None);
    tokio::spawn(server.run(listener, shutdown.subscribe()));

    let response = reqwest::Client::new()
        .post(format!("http://{proxy_addr}/cancel-order"))
        .json(&json!({ "orderId": "ord-7" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "error": "Failed to cancel order", "details": "Fetch API error: bad gateway" })
    );
    assert_eq!(upstream.request_count(), 1);

    shutdown.trigger();
}
