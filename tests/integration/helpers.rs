//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use stablehub_api::{RecordStores, build_app, build_state};
use stablehub_auth::jwt::JwtEncoder;
use stablehub_core::config::{AppConfig, StorageProviderKind};
use stablehub_database::MemoryStore;
use stablehub_entity::horse::{
    HealthInfo, Horse, MediaItem, Pedigree, PriceInfo, TrainingInfo, Xray, XrayAsset,
};
use stablehub_entity::member::MemberRole;
use stablehub_entity::organization::{Organization, OrganizationContact, OrganizationProfile};
use stablehub_storage::{LocalBlobStore, build_blob_store};

pub const PUBLIC_BASE_URL: &str = "http://stablehub.test";
pub const SIGNING_SECRET: &str = "integration-signing-secret-0123456789abcdef";
pub const SHARE_PASSWORD: &str = "bay-mare-canters-at-dawn";
pub const XRAY_PATH: &str = "xrays/front-left.png";
pub const XRAY_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";
/// Socket peer attached to every test request.
pub const PEER_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 40_000);

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// In-memory record store behind the router
    pub store: MemoryStore,
    /// Local blob store rooted in `_blob_root`
    pub blobs: Arc<LocalBlobStore>,
    /// Application config
    pub config: AppConfig,
    /// Organization owning the seeded horse
    pub organization_id: Uuid,
    /// The seeded horse
    pub horse_id: Uuid,
    encoder: JwtEncoder,
    _blob_root: TempDir,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application after adjusting the default test config.
    pub async fn with_config(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let blob_root = TempDir::new().expect("Failed to create blob root");

        let mut config = AppConfig::default();
        config.server.public_base_url = PUBLIC_BASE_URL.to_string();
        config.auth.jwt_secret = "integration-jwt-secret-0123456789abcdef".to_string();
        config.auth.argon2_memory_kib = 1024;
        config.auth.argon2_iterations = 1;
        config.storage.provider = StorageProviderKind::Local;
        config.storage.local.root_path = blob_root.path().display().to_string();
        config.storage.local.signing_secret = SIGNING_SECRET.to_string();
        config.share.max_password_attempts = 3;
        configure(&mut config);
        config.validate().expect("Invalid test config");

        let blobs = build_blob_store(&config.storage, &config.server.public_base_url)
            .await
            .expect("Failed to init blob store");
        let local = blobs.local.clone().expect("Local blob store");
        local
            .put(XRAY_PATH, XRAY_BYTES)
            .await
            .expect("Failed to seed blob");

        let store = MemoryStore::new();
        let organization_id = Uuid::new_v4();
        store.put_organization(sample_organization(organization_id)).await;
        let horse = sample_horse(organization_id);
        let horse_id = horse.id;
        store.put_horse(horse).await;

        let encoder = JwtEncoder::new(&config.auth);
        let state = build_state(config.clone(), None, RecordStores::memory(&store), blobs)
            .expect("Failed to build state");
        let router = build_app(state);

        Self {
            router,
            store,
            blobs: local,
            config,
            organization_id,
            horse_id,
            encoder,
            _blob_root: blob_root,
        }
    }

    /// A session token for a new member of the seeded organization.
    pub fn member_token(&self, role: MemberRole) -> String {
        self.token_for(Uuid::new_v4(), self.organization_id, role)
    }

    /// A session token for `user_id` acting in `organization_id`.
    pub fn token_for(&self, user_id: Uuid, organization_id: Uuid, role: MemberRole) -> String {
        self.encoder
            .issue(user_id, organization_id, role, Duration::hours(1))
            .expect("Failed to issue token")
    }

    /// Create a share link through the API and return its `data` object.
    pub async fn create_link(&self, token: &str, body: Value) -> Value {
        let path = format!("/api/horses/{}/share-links", self.horse_id);
        let response = self.request("POST", &path, Some(body), Some(token)).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create failed: {:?}",
            response.body
        );
        response.body["data"].clone()
    }

    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let bearer = token.map(|t| format!("Bearer {t}"));
        let mut headers = Vec::new();
        if let Some(bearer) = bearer.as_deref() {
            headers.push(("Authorization", bearer));
        }
        self.request_with_headers(method, path, body, &headers).await
    }

    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let raw = self.send(method, path, body, headers).await;
        let body: Value = serde_json::from_slice(&raw.bytes).unwrap_or(Value::Null);
        TestResponse {
            status: raw.status,
            headers: raw.headers,
            body,
        }
    }

    /// Send a request and return the undecoded body.
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> RawResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let mut req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(PEER_ADDR)));

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();

        RawResponse {
            status,
            headers,
            bytes,
        }
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of a failure body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

pub fn sample_organization(organization_id: Uuid) -> OrganizationProfile {
    OrganizationProfile {
        organization: Organization {
            id: organization_id,
            name: "Stal Hendrix".to_string(),
            email: Some("sales@hendrix.test".to_string()),
            phone: Some("+31 40 000 0000".to_string()),
            website: None,
            logo_url: None,
            city: Some("Valkenswaard".to_string()),
            country: Some("NL".to_string()),
            created_at: Utc::now(),
        },
        contacts: vec![OrganizationContact {
            id: Uuid::new_v4(),
            organization_id,
            name: "Emile".to_string(),
            role: Some("Sales".to_string()),
            email: Some("emile@hendrix.test".to_string()),
            phone: None,
        }],
    }
}

pub fn sample_horse(organization_id: Uuid) -> Horse {
    Horse {
        id: Uuid::new_v4(),
        organization_id,
        name: "Chacco Blue II".to_string(),
        breed: Some("Oldenburger".to_string()),
        age: Some(8),
        color: Some("Bay".to_string()),
        gender: Some("Stallion".to_string()),
        height: Some(170.0),
        description: Some("Careful and fast against the clock".to_string()),
        pedigree: Pedigree {
            sire: Some("Chacco-Blue".to_string()),
            dam: Some("Contendra".to_string()),
            ..Pedigree::default()
        },
        health: HealthInfo {
            last_vaccination: NaiveDate::from_ymd_opt(2026, 3, 1),
            ..HealthInfo::default()
        },
        training: TrainingInfo {
            discipline: Some("Show jumping".to_string()),
            ..TrainingInfo::default()
        },
        competitions: Vec::new(),
        images: vec![MediaItem {
            url: "https://cdn.test/chacco-1.jpg".to_string(),
            caption: Some("Grand Prix".to_string()),
            sort_order: 0,
        }],
        videos: Vec::new(),
        price: Some(PriceInfo {
            amount: 250_000,
            currency: "EUR".to_string(),
            negotiable: true,
        }),
        xrays: vec![
            Xray {
                id: Uuid::new_v4(),
                title: "Front left".to_string(),
                body_part: Some("hoof".to_string()),
                taken_on: NaiveDate::from_ymd_opt(2026, 1, 15),
                notes: None,
                asset: XrayAsset::Upload {
                    path: XRAY_PATH.to_string(),
                },
            },
            Xray {
                id: Uuid::new_v4(),
                title: "Hock".to_string(),
                body_part: Some("hock".to_string()),
                taken_on: None,
                notes: Some("Clean".to_string()),
                asset: XrayAsset::External {
                    url: "https://vet.test/hock.png".to_string(),
                },
            },
        ],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
