//! Integration tests for anonymous share-link resolution.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use stablehub_entity::member::MemberRole;

use helpers::{PUBLIC_BASE_URL, SHARE_PASSWORD, TestApp, XRAY_BYTES};

fn shared_path(link: &serde_json::Value) -> String {
    format!("/api/shared/{}", link["token"].as_str().expect("token"))
}

#[tokio::test]
async fn test_standard_link_scenario() {
    let app = TestApp::with_config(|config| config.server.trust_proxy_headers = true).await;
    let token = app.member_token(MemberRole::Member);
    let link = app
        .create_link(
            &token,
            json!({
                "link_type": "standard",
                "shared_fields": ["description", "images"],
                "expires_at": Utc::now() + Duration::days(7),
            }),
        )
        .await;

    let response = app
        .request_with_headers(
            "GET",
            &shared_path(&link),
            None,
            &[
                ("x-forwarded-for", "203.0.113.20, 10.0.0.1"),
                ("user-agent", "Mozilla/5.0 (Macintosh)"),
                ("referer", "https://mail.test/"),
                ("cf-ipcountry", "DE"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.headers["cache-control"], "no-store");

    let horse = &response.body["data"]["horse"];
    assert_eq!(horse["name"], "Chacco Blue II");
    assert_eq!(horse["breed"], "Oldenburger");
    assert_eq!(horse["age"], 8);
    assert_eq!(horse["color"], "Bay");
    assert_eq!(horse["gender"], "Stallion");
    assert_eq!(horse["height"], 170.0);
    assert_eq!(horse["description"], "Careful and fast against the clock");
    assert_eq!(horse["images"][0]["url"], "https://cdn.test/chacco-1.jpg");
    for key in ["pedigree", "health", "training", "competitions", "price", "xrays"] {
        assert!(horse.get(key).is_none(), "{key} leaked");
    }

    let data = &response.body["data"];
    assert_eq!(data["organization"]["name"], "Stal Hendrix");
    assert_eq!(data["contacts"][0]["name"], "Emile");
    assert_eq!(data["link"]["link_type"], "standard");
    assert!(data["link"].get("token").is_none());
    assert!(data["link"].get("password_hash").is_none());

    let id = link["id"].as_str().expect("id");
    let stored = app
        .request("GET", &format!("/api/share-links/{id}"), None, Some(&token))
        .await;
    assert_eq!(stored.body["data"]["view_count"], 1);

    let views = app
        .request("GET", &format!("/api/share-links/{id}/views"), None, Some(&token))
        .await;
    assert_eq!(views.status, StatusCode::OK);
    assert_eq!(views.body["data"]["total_items"], 1);
    let entry = &views.body["data"]["items"][0];
    assert_eq!(entry["ip_address"], "203.0.113.20");
    assert_eq!(entry["user_agent"], "Mozilla/5.0 (Macintosh)");
    assert_eq!(entry["referer"], "https://mail.test/");
    assert_eq!(entry["country"], "DE");
}

#[tokio::test]
async fn test_one_time_link_scenario() {
    let app = TestApp::new().await;
    let token = app.member_token(MemberRole::Member);
    let link = app
        .create_link(
            &token,
            json!({ "link_type": "one_time", "shared_fields": ["pedigree"] }),
        )
        .await;
    assert_eq!(link["max_views"], 1);

    let first = app.request("GET", &shared_path(&link), None, None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"]["horse"]["pedigree"]["sire"], "Chacco-Blue");

    let second = app.request("GET", &shared_path(&link), None, None).await;
    assert_eq!(second.status, StatusCode::GONE);
    assert_eq!(second.error_code(), "SHARE_EXHAUSTED");

    assert_eq!(app.store.view_entries().await, 1);
}

#[tokio::test]
async fn test_unknown_token() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", &format!("/api/shared/{}", "0".repeat(64)), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "SHARE_NOT_FOUND");

    let response = app.request("GET", "/api/shared/not-a-token", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_link() {
    let app = TestApp::new().await;
    let token = app.member_token(MemberRole::Member);
    let link = app
        .create_link(
            &token,
            json!({ "link_type": "password_protected", "shared_fields": ["price"], "password": SHARE_PASSWORD }),
        )
        .await;

    let id = link["id"].as_str().expect("id").parse().expect("uuid");
    assert!(
        app.store
            .set_expires_at(id, Utc::now() - Duration::minutes(1))
            .await
    );

    // Expiry is reported before the password is even looked at.
    let response = app.request("GET", &shared_path(&link), None, None).await;
    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(response.error_code(), "SHARE_EXPIRED");
}

#[tokio::test]
async fn test_password_protected_link() {
    let app = TestApp::new().await;
    let token = app.member_token(MemberRole::Member);
    let link = app
        .create_link(
            &token,
            json!({ "link_type": "password_protected", "shared_fields": ["health"], "password": SHARE_PASSWORD }),
        )
        .await;
    assert!(link.get("password_hash").is_none());
    let path = shared_path(&link);

    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "PASSWORD_REQUIRED");

    let response = app
        .request("POST", &path, Some(json!({ "password": "wrong-horse" })), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "PASSWORD_INVALID");

    let response = app
        .request("POST", &path, Some(json!({ "password": SHARE_PASSWORD })), None)
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert!(response.body["data"]["horse"]["health"].is_object());
}

#[tokio::test]
async fn test_password_attempts_are_throttled() {
    let app = TestApp::new().await;
    let token = app.member_token(MemberRole::Member);
    let link = app
        .create_link(
            &token,
            json!({ "link_type": "password_protected", "shared_fields": ["price"], "password": SHARE_PASSWORD }),
        )
        .await;
    let path = shared_path(&link);

    // Without a trusted proxy, forged forwarding headers do not change the
    // client the failures are counted against.
    for n in 0..3 {
        let forged = format!("203.0.113.{n}");
        let response = app
            .request_with_headers(
                "POST",
                &path,
                Some(json!({ "password": "guess" })),
                &[("x-forwarded-for", forged.as_str())],
            )
            .await;
        assert_eq!(response.error_code(), "PASSWORD_INVALID");
    }

    let response = app
        .request_with_headers(
            "POST",
            &path,
            Some(json!({ "password": SHARE_PASSWORD })),
            &[("x-forwarded-for", "198.51.100.77")],
        )
        .await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.error_code(), "TOO_MANY_ATTEMPTS");
}

#[tokio::test]
async fn test_rotating_clients_hit_link_cap() {
    let app = TestApp::with_config(|config| {
        config.server.trust_proxy_headers = true;
        config.share.max_password_attempts_per_link = 6;
    })
    .await;
    let token = app.member_token(MemberRole::Member);
    let link = app
        .create_link(
            &token,
            json!({ "link_type": "password_protected", "shared_fields": ["price"], "password": SHARE_PASSWORD }),
        )
        .await;
    let path = shared_path(&link);

    let mut refused = 0;
    for n in 0..20 {
        let client = format!("203.0.113.{n}");
        let response = app
            .request_with_headers(
                "POST",
                &path,
                Some(json!({ "password": "guess" })),
                &[("x-forwarded-for", client.as_str())],
            )
            .await;
        match response.error_code() {
            "PASSWORD_INVALID" => assert!(n < 6, "guess {n} was evaluated"),
            "TOO_MANY_ATTEMPTS" => refused += 1,
            other => panic!("unexpected error code {other}"),
        }
    }
    assert_eq!(refused, 14);

    let response = app
        .request_with_headers(
            "POST",
            &path,
            Some(json!({ "password": SHARE_PASSWORD })),
            &[("x-forwarded-for", "198.51.100.1")],
        )
        .await;
    assert_eq!(response.error_code(), "TOO_MANY_ATTEMPTS");
}

#[tokio::test]
async fn test_xray_assets_are_signed_and_downloadable() {
    let app = TestApp::new().await;
    let token = app.member_token(MemberRole::Member);
    let link = app
        .create_link(
            &token,
            json!({ "link_type": "standard", "shared_fields": ["xrays"] }),
        )
        .await;

    let response = app.request("GET", &shared_path(&link), None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let xrays = response.body["data"]["horse"]["xrays"]
        .as_array()
        .expect("xrays");
    assert_eq!(xrays.len(), 2);
    assert_eq!(xrays[1]["file_url"], "https://vet.test/hock.png");

    let signed = xrays[0]["file_url"].as_str().expect("signed url");
    let path = signed
        .strip_prefix(PUBLIC_BASE_URL)
        .expect("url on public base");
    assert!(path.starts_with("/api/blobs/xrays/front-left.png?expires="));

    let download = app.send("GET", path, None, &[]).await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.headers["content-type"], "image/png");
    assert_eq!(download.bytes, XRAY_BYTES);
}
