//! Integration tests for health endpoints.

mod helpers;

use axum::http::StatusCode;

use helpers::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert!(response.body["data"]["version"].is_string());
}

#[tokio::test]
async fn test_health_detailed() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health/detailed", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["status"], "ok");
    assert_eq!(data["database"]["status"], "not_configured");
    assert_eq!(data["storage"]["status"], "ok");
    assert_eq!(data["storage"]["provider"], "local");
}
