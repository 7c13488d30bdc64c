//! Shared setup for share-link service tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use stablehub_auth::password::{PasswordHasher, SharePasswordPolicy};
use stablehub_core::config::{AuthConfig, ShareConfig, StorageConfig};
use stablehub_core::error::AppError;
use stablehub_core::result::AppResult;
use stablehub_core::traits::BlobStore;
use stablehub_core::types::pagination::{PageRequest, PageResponse};
use stablehub_database::memory::MemoryStore;
use stablehub_database::store::ViewLedger;
use stablehub_entity::horse::{
    HealthInfo, Horse, MediaItem, Pedigree, PriceInfo, TrainingInfo, Xray, XrayAsset,
};
use stablehub_entity::member::MemberRole;
use stablehub_entity::organization::{Organization, OrganizationContact, OrganizationProfile};
use stablehub_entity::share::{LinkType, NewShareLinkView, ShareLinkView, SharedField};

use super::{
    CreateShareLinkRequest, ShareCollaborators, ShareLinkAccessController, ShareLinkService,
};
use crate::context::RequestContext;

pub const PASSWORD: &str = "bay-mare-canters-at-dawn";

#[derive(Debug)]
pub struct FakeBlobs;

#[async_trait]
impl BlobStore for FakeBlobs {
    fn provider_type(&self) -> &str {
        "fake"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn create_signed_url(&self, path: &str, ttl: Duration) -> AppResult<String> {
        Ok(format!("https://blobs.test/{path}?ttl={}", ttl.as_secs()))
    }

    async fn remove(&self, _paths: &[String]) -> AppResult<()> {
        Ok(())
    }
}

/// A ledger whose writes always fail or hang.
#[derive(Debug)]
pub struct BrokenLedger {
    pub hang: bool,
}

#[async_trait]
impl ViewLedger for BrokenLedger {
    async fn append(&self, _view: &NewShareLinkView) -> AppResult<ShareLinkView> {
        if self.hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Err(AppError::database("ledger unavailable"))
    }

    async fn list_for_link(
        &self,
        _share_link_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLinkView>> {
        Ok(PageResponse::new(Vec::new(), page.page, page.page_size, 0))
    }
}

pub struct Fixture {
    pub store: MemoryStore,
    pub organization_id: Uuid,
    pub horse_id: Uuid,
    pub owner: RequestContext,
    pub controller: ShareLinkAccessController,
    pub service: ShareLinkService,
}

pub fn share_config() -> ShareConfig {
    ShareConfig {
        max_password_attempts: 3,
        max_password_attempts_per_link: 5,
        ledger_write_timeout_ms: 200,
        ..ShareConfig::default()
    }
}

pub fn member(organization_id: Uuid, role: MemberRole) -> RequestContext {
    RequestContext::new(Uuid::new_v4(), organization_id, role, None, None)
}

pub fn sample_horse(organization_id: Uuid) -> Horse {
    Horse {
        id: Uuid::new_v4(),
        organization_id,
        name: "Quidam's Lady".to_string(),
        breed: Some("Holsteiner".to_string()),
        age: Some(7),
        color: Some("Grey".to_string()),
        gender: Some("Mare".to_string()),
        height: Some(167.5),
        description: Some("Brave and scopey".to_string()),
        pedigree: Pedigree {
            sire: Some("Quidam de Revel".to_string()),
            dam: Some("Lady Lux".to_string()),
            ..Pedigree::default()
        },
        health: HealthInfo {
            last_vaccination: NaiveDate::from_ymd_opt(2026, 2, 1),
            ..HealthInfo::default()
        },
        training: TrainingInfo {
            discipline: Some("Show jumping".to_string()),
            ..TrainingInfo::default()
        },
        competitions: Vec::new(),
        images: vec![MediaItem {
            url: "https://cdn.test/lady-1.jpg".to_string(),
            caption: Some("Warm-up".to_string()),
            sort_order: 0,
        }],
        videos: Vec::new(),
        price: Some(PriceInfo {
            amount: 60_000,
            currency: "EUR".to_string(),
            negotiable: false,
        }),
        xrays: vec![Xray {
            id: Uuid::new_v4(),
            title: "Front feet".to_string(),
            body_part: Some("hoof".to_string()),
            taken_on: None,
            notes: None,
            asset: XrayAsset::Upload {
                path: "xrays/front.png".to_string(),
            },
        }],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub async fn fixture() -> Fixture {
    fixture_with_ledger(None).await
}

pub async fn fixture_with_ledger(ledger: Option<Arc<dyn ViewLedger>>) -> Fixture {
    let store = MemoryStore::new();
    let organization_id = Uuid::new_v4();
    store
        .put_organization(OrganizationProfile {
            organization: Organization {
                id: organization_id,
                name: "Stoeterij De Wei".to_string(),
                email: Some("info@dewei.test".to_string()),
                phone: None,
                website: None,
                logo_url: None,
                city: Some("Ermelo".to_string()),
                country: Some("NL".to_string()),
                created_at: Utc::now(),
            },
            contacts: vec![OrganizationContact {
                id: Uuid::new_v4(),
                organization_id,
                name: "Anouk".to_string(),
                role: Some("Sales".to_string()),
                email: None,
                phone: None,
            }],
        })
        .await;
    let horse = sample_horse(organization_id);
    let horse_id = horse.id;
    store.put_horse(horse).await;

    let auth = AuthConfig {
        argon2_memory_kib: 1024,
        argon2_iterations: 1,
        ..AuthConfig::default()
    };
    let hasher = Arc::new(PasswordHasher::new(&auth).expect("hasher"));
    let stores = ShareCollaborators {
        links: Arc::new(store.clone()),
        ledger: ledger.unwrap_or_else(|| Arc::new(store.clone()) as Arc<dyn ViewLedger>),
        horses: Arc::new(store.clone()),
        organizations: Arc::new(store.clone()),
        blobs: Arc::new(FakeBlobs),
    };
    let config = share_config();

    Fixture {
        controller: ShareLinkAccessController::new(
            stores.clone(),
            hasher.clone(),
            &config,
            &StorageConfig::default(),
        ),
        service: ShareLinkService::new(
            stores,
            hasher,
            SharePasswordPolicy::new(&auth),
            config,
            "https://stablehub.test",
        ),
        owner: member(organization_id, MemberRole::Owner),
        store,
        organization_id,
        horse_id,
    }
}

pub fn request(link_type: LinkType, fields: &[SharedField]) -> CreateShareLinkRequest {
    CreateShareLinkRequest {
        link_type,
        shared_fields: fields.to_vec(),
        expires_at: None,
        password: (link_type == LinkType::PasswordProtected).then(|| PASSWORD.to_string()),
        max_views: None,
    }
}
