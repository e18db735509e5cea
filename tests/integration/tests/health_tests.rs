//! Health endpoint tests
//!
//! Run with: cargo test -p integration-tests --test health_tests

use reqwest::StatusCode;

use herald_bot::RuntimeStatus;
use herald_service::PassReport;
use integration_tests::TestServer;

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start(RuntimeStatus::default())
        .await
        .expect("Failed to start server");

    let response = server.get("/health").await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready_tracks_gateway_and_last_pass() {
    let status = RuntimeStatus::default();
    let server = TestServer::start(status.clone())
        .await
        .expect("Failed to start server");

    let response = server.get("/health/ready").await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    status.set_gateway_connected(true);
    status.record_pass(PassReport {
        members: 2,
        live: 1,
        ..PassReport::default()
    });

    let response = server.get("/health/ready").await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["gateway"], "connected");
    assert_eq!(body["last_pass"]["members"], 2);
}
