//! In-memory record stores using a Tokio mutex for single-node deployments
//! and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use stablehub_core::error::AppError;
use stablehub_core::result::AppResult;
use stablehub_core::types::pagination::{PageRequest, PageResponse};
use stablehub_entity::horse::Horse;
use stablehub_entity::organization::OrganizationProfile;
use stablehub_entity::share::{CreateShareLink, NewShareLinkView, ShareLink, ShareLinkView};

use crate::store::{HorseStore, OrganizationStore, ShareLinkStore, ViewClaim, ViewLedger};

#[derive(Debug, Default)]
struct InnerState {
    links: HashMap<Uuid, ShareLink>,
    views: Vec<ShareLinkView>,
    horses: HashMap<Uuid, Horse>,
    organizations: HashMap<Uuid, OrganizationProfile>,
}

/// A single in-memory store implementing every record-store trait.
///
/// All state sits behind one mutex, so each trait method is atomic with
/// respect to every other. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an organization and its contacts.
    pub async fn put_organization(&self, profile: OrganizationProfile) {
        let mut state = self.state.lock().await;
        state
            .organizations
            .insert(profile.organization.id, profile);
    }

    /// Insert or replace a horse record.
    pub async fn put_horse(&self, horse: Horse) {
        let mut state = self.state.lock().await;
        state.horses.insert(horse.id, horse);
    }

    /// Remove a horse and, as the database would by cascade, its links and
    /// their ledger entries.
    pub async fn remove_horse(&self, horse_id: Uuid) {
        let mut state = self.state.lock().await;
        state.horses.remove(&horse_id);
        let removed: Vec<Uuid> = state
            .links
            .values()
            .filter(|l| l.horse_id == horse_id)
            .map(|l| l.id)
            .collect();
        for id in &removed {
            state.links.remove(id);
        }
        state.views.retain(|v| !removed.contains(&v.share_link_id));
    }

    /// Overwrite a link's expiry. Used to simulate time passing.
    pub async fn set_expires_at(&self, id: Uuid, expires_at: DateTime<Utc>) -> bool {
        let mut state = self.state.lock().await;
        match state.links.get_mut(&id) {
            Some(link) => {
                link.expires_at = expires_at;
                true
            }
            None => false,
        }
    }

    /// Total number of ledger entries across all links.
    pub async fn view_entries(&self) -> usize {
        self.state.lock().await.views.len()
    }
}

fn paginate<T: Clone + serde::Serialize>(items: Vec<T>, page: &PageRequest) -> PageResponse<T> {
    let total = items.len() as u64;
    let slice = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    PageResponse::new(slice, page.page, page.page_size, total)
}

#[async_trait]
impl ShareLinkStore for MemoryStore {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        let state = self.state.lock().await;
        Ok(state.links.values().find(|l| l.token == token).cloned())
    }

    async fn find_by_id(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<ShareLink>> {
        let state = self.state.lock().await;
        Ok(state
            .links
            .get(&id)
            .filter(|l| l.organization_id == organization_id)
            .cloned())
    }

    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink> {
        let mut state = self.state.lock().await;

        if state.links.values().any(|l| l.token == data.token) {
            return Err(AppError::conflict("Share link token already exists"));
        }
        let horse_owned = state
            .horses
            .get(&data.horse_id)
            .is_some_and(|h| h.organization_id == data.organization_id);
        if !horse_owned {
            return Err(AppError::database(
                "Share link references a horse outside its organization",
            ));
        }

        let link = ShareLink {
            id: Uuid::new_v4(),
            horse_id: data.horse_id,
            organization_id: data.organization_id,
            created_by: data.created_by,
            token: data.token.clone(),
            link_type: data.link_type,
            expires_at: data.expires_at,
            password_hash: data.password_hash.clone(),
            view_count: 0,
            max_views: data.max_views,
            shared_fields: data.shared_fields.clone(),
            created_at: Utc::now(),
            last_viewed_at: None,
        };
        state.links.insert(link.id, link.clone());
        Ok(link)
    }

    async fn delete(&self, organization_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let owned = state
            .links
            .get(&id)
            .is_some_and(|l| l.organization_id == organization_id);
        if !owned {
            return Ok(false);
        }
        state.links.remove(&id);
        state.views.retain(|v| v.share_link_id != id);
        Ok(true)
    }

    async fn list_for_horse(
        &self,
        organization_id: Uuid,
        horse_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLink>> {
        let state = self.state.lock().await;
        let mut links: Vec<ShareLink> = state
            .links
            .values()
            .filter(|l| l.organization_id == organization_id && l.horse_id == horse_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(links, page))
    }

    async fn claim_view(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<ViewClaim> {
        let mut state = self.state.lock().await;
        let Some(link) = state.links.get_mut(&id) else {
            return Ok(ViewClaim::Missing);
        };
        if link.is_expired_at(now) {
            return Ok(ViewClaim::Expired);
        }
        if link.max_views.is_some_and(|max| link.view_count >= max) {
            return Ok(ViewClaim::Exhausted);
        }
        link.view_count += 1;
        link.last_viewed_at = Some(now);
        Ok(ViewClaim::Claimed(link.clone()))
    }
}

#[async_trait]
impl ViewLedger for MemoryStore {
    async fn append(&self, view: &NewShareLinkView) -> AppResult<ShareLinkView> {
        let mut state = self.state.lock().await;
        if !state.links.contains_key(&view.share_link_id) {
            return Err(AppError::database("View references a missing share link"));
        }
        let row = view.clone().into_view(Uuid::new_v4());
        state.views.push(row.clone());
        Ok(row)
    }

    async fn list_for_link(
        &self,
        share_link_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLinkView>> {
        let state = self.state.lock().await;
        // Entries are appended in order, so reverse iteration is newest first.
        let views: Vec<ShareLinkView> = state
            .views
            .iter()
            .rev()
            .filter(|v| v.share_link_id == share_link_id)
            .cloned()
            .collect();
        Ok(paginate(views, page))
    }
}

#[async_trait]
impl HorseStore for MemoryStore {
    async fn find_in_organization(
        &self,
        organization_id: Uuid,
        horse_id: Uuid,
    ) -> AppResult<Option<Horse>> {
        let state = self.state.lock().await;
        Ok(state
            .horses
            .get(&horse_id)
            .filter(|h| h.organization_id == organization_id)
            .cloned())
    }
}

#[async_trait]
impl OrganizationStore for MemoryStore {
    async fn find_with_contacts(
        &self,
        organization_id: Uuid,
    ) -> AppResult<Option<OrganizationProfile>> {
        let state = self.state.lock().await;
        Ok(state.organizations.get(&organization_id).cloned())
    }
}
