//! Integration tests for member-facing share-link management.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use stablehub_entity::member::MemberRole;

use helpers::{PUBLIC_BASE_URL, TestApp};

#[tokio::test]
async fn test_requires_session_token() {
    let app = TestApp::new().await;
    let path = format!("/api/horses/{}/share-links", app.horse_id);

    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.request("GET", &path, None, Some("not-a-jwt")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_returns_public_url() {
    let app = TestApp::new().await;
    let token = app.member_token(MemberRole::Member);

    let link = app
        .create_link(
            &token,
            json!({ "link_type": "standard", "shared_fields": ["images", "videos"] }),
        )
        .await;

    let share_token = link["token"].as_str().expect("token");
    assert_eq!(share_token.len(), 64);
    assert!(share_token.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(
        link["url"],
        format!("{PUBLIC_BASE_URL}/shared/{share_token}")
    );
    assert_eq!(link["view_count"], 0);
    assert_eq!(link["horse_id"], app.horse_id.to_string());
}

#[tokio::test]
async fn test_create_validation() {
    let app = TestApp::new().await;
    let token = app.member_token(MemberRole::Member);
    let path = format!("/api/horses/{}/share-links", app.horse_id);

    let cases = [
        json!({ "link_type": "standard", "shared_fields": [] }),
        json!({ "link_type": "password_protected", "shared_fields": ["price"] }),
        json!({ "link_type": "password_protected", "shared_fields": ["price"], "password": "short" }),
        json!({ "link_type": "standard", "shared_fields": ["price"], "max_views": 2 }),
        json!({ "link_type": "one_time", "shared_fields": ["price"], "max_views": 0 }),
        json!({ "link_type": "standard", "shared_fields": ["price"], "expires_at": "2001-01-01T00:00:00Z" }),
    ];

    for body in cases {
        let response = app.request("POST", &path, Some(body.clone()), Some(&token)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response.error_code(), "VALIDATION_ERROR", "{body}");
    }
}

#[tokio::test]
async fn test_list_for_horse_paginates() {
    let app = TestApp::new().await;
    let token = app.member_token(MemberRole::Member);
    for _ in 0..3 {
        app.create_link(
            &token,
            json!({ "link_type": "standard", "shared_fields": ["price"] }),
        )
        .await;
    }

    let path = format!(
        "/api/horses/{}/share-links?page=2&per_page=2",
        app.horse_id
    );
    let response = app.request("GET", &path, None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["total_items"], 3);
    assert_eq!(data["page"], 2);
    assert_eq!(data["items"].as_array().expect("items").len(), 1);
    assert_eq!(data["has_previous"], true);
    assert_eq!(data["has_next"], false);
}

#[tokio::test]
async fn test_revoke_permissions() {
    let app = TestApp::new().await;
    let author = Uuid::new_v4();
    let author_token = app.token_for(author, app.organization_id, MemberRole::Member);
    let colleague_token = app.member_token(MemberRole::Member);

    let link = app
        .create_link(
            &author_token,
            json!({ "link_type": "standard", "shared_fields": ["price"] }),
        )
        .await;
    let path = format!("/api/share-links/{}", link["id"].as_str().expect("id"));

    let response = app.request("DELETE", &path, None, Some(&colleague_token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.request("DELETE", &path, None, Some(&author_token)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", &path, None, Some(&author_token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // A revoked link no longer resolves.
    let shared = format!("/api/shared/{}", link["token"].as_str().expect("token"));
    let response = app.request("GET", &shared, None, None).await;
    assert_eq!(response.error_code(), "SHARE_NOT_FOUND");
}

#[tokio::test]
async fn test_admin_can_revoke_any_link() {
    let app = TestApp::new().await;
    let member_token = app.member_token(MemberRole::Member);
    let admin_token = app.member_token(MemberRole::Admin);

    let link = app
        .create_link(
            &member_token,
            json!({ "link_type": "one_time", "shared_fields": ["price"] }),
        )
        .await;
    let path = format!("/api/share-links/{}", link["id"].as_str().expect("id"));

    let response = app.request("DELETE", &path, None, Some(&admin_token)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_other_organization_is_isolated() {
    let app = TestApp::new().await;
    let token = app.member_token(MemberRole::Owner);
    let outsider = app.token_for(Uuid::new_v4(), Uuid::new_v4(), MemberRole::Owner);

    let link = app
        .create_link(
            &token,
            json!({ "link_type": "standard", "shared_fields": ["price"] }),
        )
        .await;
    let id = link["id"].as_str().expect("id");

    for (method, path) in [
        ("GET", format!("/api/share-links/{id}")),
        ("GET", format!("/api/share-links/{id}/views")),
        ("DELETE", format!("/api/share-links/{id}")),
        ("GET", format!("/api/horses/{}/share-links", app.horse_id)),
    ] {
        let response = app.request(method, &path, None, Some(&outsider)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{method} {path}");
    }

    let response = app
        .request(
            "POST",
            &format!("/api/horses/{}/share-links", app.horse_id),
            Some(json!({ "link_type": "standard", "shared_fields": ["price"] })),
            Some(&outsider),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
