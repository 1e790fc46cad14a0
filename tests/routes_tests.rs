//! End-to-end tests for the `/hello` and `/ping` routes.
//!
//! Each test starts the real router on an ephemeral port and points the
//! metadata client at an `httpmock` server standing in for the instance
//! metadata service.
//!
//! Run with: cargo test --test routes_tests
use std::time::Duration;

use az_greeter::config::{AppConfig, METADATA_AZ_PATH};
use az_greeter::{create_router, AppState};
use httpmock::prelude::*;
use reqwest::{Method, StatusCode};

/// Start the service against `metadata_url` and return its base URL.
async fn spawn_app(metadata_url: &str, timeout_ms: u64) -> String {
    let mut config = AppConfig::default();
    config.metadata.url = metadata_url.to_string();
    config.metadata.connect_timeout_ms = 500;
    config.metadata.timeout_ms = timeout_ms;

    let state = AppState::new(&config).expect("metadata client should build");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, create_router(state))
            .await
            .expect("server failed");
    });

    format!("http://{}", addr)
}

/// A URL on localhost where nothing is listening.
fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}{}", port, METADATA_AZ_PATH)
}

async fn get(url: &str) -> (StatusCode, String) {
    let response = reqwest::get(url).await.expect("request failed");
    let status = response.status();
    (status, response.text().await.expect("body"))
}

#[tokio::test]
async fn test_hello_returns_zone_greeting() {
    let metadata = MockServer::start_async().await;
    let mock = metadata
        .mock_async(|when, then| {
            when.method(GET).path(METADATA_AZ_PATH);
            then.status(200).body("us-east-1a");
        })
        .await;

    let base = spawn_app(&metadata.url(METADATA_AZ_PATH), 2000).await;
    let (status, body) = get(&format!("{}/hello", base)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello! My backend AZ is us-east-1a");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_hello_joins_multiline_body() {
    let metadata = MockServer::start_async().await;
    metadata
        .mock_async(|when, then| {
            when.method(GET).path(METADATA_AZ_PATH);
            then.status(200).body("us-\neast-1a\n");
        })
        .await;

    let base = spawn_app(&metadata.url(METADATA_AZ_PATH), 2000).await;
    let (status, body) = get(&format!("{}/hello", base)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello! My backend AZ is us-east-1a");
}

#[tokio::test]
async fn test_hello_accepts_any_method() {
    let metadata = MockServer::start_async().await;
    let mock = metadata
        .mock_async(|when, then| {
            when.method(GET).path(METADATA_AZ_PATH);
            then.status(200).body("eu-west-1b");
        })
        .await;

    let base = spawn_app(&metadata.url(METADATA_AZ_PATH), 2000).await;
    let client = reqwest::Client::new();

    for method in [Method::GET, Method::POST, Method::PUT] {
        let response = client
            .request(method.clone(), format!("{}/hello?ignored=1", base))
            .body("ignored")
            .send()
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::OK, "method {}", method);
        assert_eq!(
            response.text().await.unwrap(),
            "Hello! My backend AZ is eu-west-1b"
        );
    }

    // The outbound call is always a GET, one per inbound request
    mock.assert_hits_async(3).await;
}

#[tokio::test]
async fn test_hello_does_not_cache() {
    let metadata = MockServer::start_async().await;
    let base = spawn_app(&metadata.url(METADATA_AZ_PATH), 2000).await;

    let mut zone_a = metadata
        .mock_async(|when, then| {
            when.method(GET).path(METADATA_AZ_PATH);
            then.status(200).body("zone-A");
        })
        .await;
    let (_, first) = get(&format!("{}/hello", base)).await;
    zone_a.delete_async().await;

    metadata
        .mock_async(|when, then| {
            when.method(GET).path(METADATA_AZ_PATH);
            then.status(200).body("zone-B");
        })
        .await;
    let (_, second) = get(&format!("{}/hello", base)).await;

    assert_eq!(first, "Hello! My backend AZ is zone-A");
    assert_eq!(second, "Hello! My backend AZ is zone-B");
}

#[tokio::test]
async fn test_hello_unreachable_metadata_is_server_error() {
    let base = spawn_app(&unreachable_url(), 2000).await;

    for _ in 0..3 {
        let (status, body) = get(&format!("{}/hello", base)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body.contains("Hello!"));
    }
}

#[tokio::test]
async fn test_hello_metadata_error_status_is_bad_gateway() {
    let metadata = MockServer::start_async().await;
    metadata
        .mock_async(|when, then| {
            when.method(GET).path(METADATA_AZ_PATH);
            then.status(404).body("not found");
        })
        .await;

    let base = spawn_app(&metadata.url(METADATA_AZ_PATH), 2000).await;
    let (status, body) = get(&format!("{}/hello", base)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!body.contains("Hello!"));
}

#[tokio::test]
async fn test_hello_hanging_metadata_times_out() {
    let metadata = MockServer::start_async().await;
    metadata
        .mock_async(|when, then| {
            when.method(GET).path(METADATA_AZ_PATH);
            then.status(200)
                .body("us-east-1a")
                .delay(Duration::from_secs(5));
        })
        .await;

    let base = spawn_app(&metadata.url(METADATA_AZ_PATH), 300).await;
    let started = std::time::Instant::now();
    let (status, _) = get(&format!("{}/hello", base)).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_ping_returns_ok_for_any_request() {
    let base = spawn_app(&unreachable_url(), 2000).await;
    let client = reqwest::Client::new();

    for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
        let response = client
            .request(method.clone(), format!("{}/ping", base))
            .header("x-custom", "anything")
            .body("{\"payload\": true}")
            .send()
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::OK, "method {}", method);
        assert_eq!(response.text().await.unwrap(), "ok");
    }
}

#[tokio::test]
async fn test_ping_unaffected_by_metadata_failure() {
    let base = spawn_app(&unreachable_url(), 2000).await;

    let (hello_status, _) = get(&format!("{}/hello", base)).await;
    assert!(hello_status.is_server_error());

    let (status, body) = get(&format!("{}/ping", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_responses_are_not_cacheable() {
    let base = spawn_app(&unreachable_url(), 2000).await;

    let ping = reqwest::get(format!("{}/ping", base)).await.unwrap();
    assert_eq!(ping.headers()["cache-control"], "no-store");

    let hello = reqwest::get(format!("{}/hello", base)).await.unwrap();
    assert_eq!(hello.headers()["cache-control"], "no-store");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let base = spawn_app(&unreachable_url(), 2000).await;
    let (status, _) = get(&format!("{}/health", base)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
