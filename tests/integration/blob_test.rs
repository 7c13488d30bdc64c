//! Integration tests for signed local blob downloads.

mod helpers;

use std::time::Duration;

use axum::http::StatusCode;
use chrono::Utc;

use stablehub_core::traits::BlobStore;
use stablehub_storage::UrlSigner;

use helpers::{PUBLIC_BASE_URL, SIGNING_SECRET, TestApp, XRAY_BYTES, XRAY_PATH};

async fn signed_path(app: &TestApp, path: &str) -> String {
    let url = app
        .blobs
        .create_signed_url(path, Duration::from_secs(600))
        .await
        .expect("sign");
    url.strip_prefix(PUBLIC_BASE_URL)
        .expect("url on public base")
        .to_string()
}

#[tokio::test]
async fn test_signed_download() {
    let app = TestApp::new().await;
    let path = signed_path(&app, XRAY_PATH).await;

    let response = app.send("GET", &path, None, &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes, XRAY_BYTES);
    assert_eq!(
        response.headers["content-length"],
        XRAY_BYTES.len().to_string()
    );
}

#[tokio::test]
async fn test_tampered_signature_rejected() {
    let app = TestApp::new().await;
    let path = signed_path(&app, XRAY_PATH).await;

    let (base, signature) = path.split_once("signature=").expect("signature");
    let mut forged = signature.to_string();
    let last = if forged.ends_with('A') { 'B' } else { 'A' };
    forged.pop();
    forged.push(last);

    let response = app
        .request("GET", &format!("{base}signature={forged}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_signature_bound_to_path() {
    let app = TestApp::new().await;
    app.blobs
        .put("xrays/other.png", b"other")
        .await
        .expect("seed");
    let path = signed_path(&app, XRAY_PATH).await;

    let moved = path.replace("front-left.png", "other.png");
    let response = app.request("GET", &moved, None, None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_expired_url_rejected() {
    let app = TestApp::new().await;
    let signer = UrlSigner::new(SIGNING_SECRET.as_bytes()).expect("signer");
    let expires = Utc::now().timestamp() - 60;
    let signature = signer.sign(XRAY_PATH, expires);

    let response = app
        .request(
            "GET",
            &format!("/api/blobs/{XRAY_PATH}?expires={expires}&signature={signature}"),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["message"], "Download link has expired");
}

#[tokio::test]
async fn test_missing_blob_is_not_found() {
    let app = TestApp::new().await;
    let path = signed_path(&app, "xrays/never-uploaded.png").await;

    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
