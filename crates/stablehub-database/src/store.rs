//! Record-store traits for the share-link path.
//!
//! Every member-facing query takes an explicit `organization_id`. The only
//! unscoped lookups are [`ShareLinkStore::find_by_token`], which is how
//! anonymous viewers address a link, and [`ShareLinkStore::claim_view`],
//! which operates on a link already resolved by token.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use stablehub_core::result::AppResult;
use stablehub_core::types::pagination::{PageRequest, PageResponse};
use stablehub_entity::horse::Horse;
use stablehub_entity::organization::OrganizationProfile;
use stablehub_entity::share::{CreateShareLink, NewShareLinkView, ShareLink, ShareLinkView};

/// Outcome of an atomic view claim.
#[derive(Debug, Clone)]
pub enum ViewClaim {
    /// The view was counted. Carries the link as updated by the claim.
    Claimed(ShareLink),
    /// A concurrent request consumed the last allowed view.
    Exhausted,
    /// The link expired between lookup and claim.
    Expired,
    /// The link was deleted between lookup and claim.
    Missing,
}

/// Persistence of share links.
#[async_trait]
pub trait ShareLinkStore: Send + Sync + Debug + 'static {
    /// Look up a link by its public token.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>>;

    /// Look up a link by id within an organization.
    async fn find_by_id(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<ShareLink>>;

    /// Persist a new link. A duplicate token is a `Conflict` error.
    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink>;

    /// Delete a link within an organization. Returns whether a row was removed.
    async fn delete(&self, organization_id: Uuid, id: Uuid) -> AppResult<bool>;

    /// List a horse's links, newest first.
    async fn list_for_horse(
        &self,
        organization_id: Uuid,
        horse_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLink>>;

    /// Atomically count one view if the link is still usable at `now`.
    ///
    /// The usability predicate (not expired, views remaining) and the
    /// increment must be a single indivisible step: under N concurrent
    /// claims of a link with one view left, exactly one returns `Claimed`.
    async fn claim_view(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<ViewClaim>;
}

/// Append-only ledger of successful resolutions.
#[async_trait]
pub trait ViewLedger: Send + Sync + Debug + 'static {
    /// Append one entry.
    async fn append(&self, view: &NewShareLinkView) -> AppResult<ShareLinkView>;

    /// List a link's entries, newest first.
    async fn list_for_link(
        &self,
        share_link_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLinkView>>;
}

/// Read access to horse records.
#[async_trait]
pub trait HorseStore: Send + Sync + Debug + 'static {
    /// Fetch a horse with all attribute groups, scoped to its organization.
    async fn find_in_organization(
        &self,
        organization_id: Uuid,
        horse_id: Uuid,
    ) -> AppResult<Option<Horse>>;
}

/// Read access to organizations.
#[async_trait]
pub trait OrganizationStore: Send + Sync + Debug + 'static {
    /// Fetch an organization with its published contacts.
    async fn find_with_contacts(
        &self,
        organization_id: Uuid,
    ) -> AppResult<Option<OrganizationProfile>>;
}
