//! Member-facing share link management.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use stablehub_auth::password::{PasswordHasher, SharePasswordPolicy};
use stablehub_core::config::ShareConfig;
use stablehub_core::error::{AppError, ErrorKind};
use stablehub_core::types::pagination::{PageRequest, PageResponse};
use stablehub_entity::share::{
    CreateShareLink, LinkType, ShareLink, ShareLinkView, SharedField, SharedFieldSet,
};

use super::ShareCollaborators;
use super::token::generate_token;
use crate::context::RequestContext;

/// Attempts at drawing a fresh token when the store reports a collision.
const TOKEN_ATTEMPTS: usize = 3;

/// Request to create a share link for a horse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareLinkRequest {
    /// Kind of link.
    pub link_type: LinkType,
    /// Categories to expose beyond the always-visible identity fields.
    pub shared_fields: Vec<SharedField>,
    /// Expiry instant (defaults to `share.default_expiry_days` from now).
    pub expires_at: Option<DateTime<Utc>>,
    /// Required for password-protected links, rejected otherwise.
    pub password: Option<String>,
    /// View cap for one-time links, rejected otherwise.
    pub max_views: Option<i32>,
}

/// A share link together with its public URL.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedShareLink {
    /// The stored link.
    #[serde(flatten)]
    pub link: ShareLink,
    /// The URL to hand to viewers.
    pub url: String,
}

/// Creates, lists, inspects and revokes share links for organization members.
#[derive(Debug, Clone)]
pub struct ShareLinkService {
    stores: ShareCollaborators,
    hasher: Arc<PasswordHasher>,
    policy: SharePasswordPolicy,
    config: ShareConfig,
    public_base_url: String,
}

impl ShareLinkService {
    /// Creates a new share link service.
    pub fn new(
        stores: ShareCollaborators,
        hasher: Arc<PasswordHasher>,
        policy: SharePasswordPolicy,
        config: ShareConfig,
        public_base_url: &str,
    ) -> Self {
        Self {
            stores,
            hasher,
            policy,
            config,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn issued(&self, link: ShareLink) -> IssuedShareLink {
        let url = format!("{}/shared/{}", self.public_base_url, link.token);
        IssuedShareLink { link, url }
    }

    async fn ensure_horse(&self, ctx: &RequestContext, horse_id: Uuid) -> Result<(), AppError> {
        self.stores
            .horses
            .find_in_organization(ctx.organization_id, horse_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Horse not found"))
    }

    /// Creates a share link for `horse_id`.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        horse_id: Uuid,
        req: CreateShareLinkRequest,
    ) -> Result<IssuedShareLink, AppError> {
        self.ensure_horse(ctx, horse_id).await?;

        if req.shared_fields.is_empty() {
            return Err(AppError::validation(
                "shared_fields must name at least one category",
            ));
        }
        let shared_fields: SharedFieldSet = req.shared_fields.iter().copied().collect();

        let now = Utc::now();
        let expires_at = req
            .expires_at
            .unwrap_or_else(|| now + Duration::days(self.config.default_expiry_days));
        if expires_at <= now {
            return Err(AppError::validation("expires_at must be in the future"));
        }
        if expires_at > now + Duration::days(self.config.max_expiry_days) {
            return Err(AppError::validation(format!(
                "expires_at must be within {} days",
                self.config.max_expiry_days
            )));
        }

        let password_hash = match (req.link_type, req.password) {
            (LinkType::PasswordProtected, Some(password)) => {
                self.policy.validate(&password)?;
                let hasher = self.hasher.clone();
                let hash = tokio::task::spawn_blocking(move || hasher.hash_password(&password))
                    .await
                    .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))??;
                Some(hash)
            }
            (LinkType::PasswordProtected, None) => {
                return Err(AppError::validation(
                    "password is required for password_protected links",
                ));
            }
            (_, Some(_)) => {
                return Err(AppError::validation(
                    "password is only accepted for password_protected links",
                ));
            }
            (_, None) => None,
        };

        let max_views = match (req.link_type, req.max_views) {
            (LinkType::OneTime, Some(max)) if max < 1 => {
                return Err(AppError::validation("max_views must be at least 1"));
            }
            (LinkType::OneTime, Some(max)) => Some(max),
            (LinkType::OneTime, None) => Some(self.config.one_time_default_max_views),
            (_, Some(_)) => {
                return Err(AppError::validation(
                    "max_views is only accepted for one_time links",
                ));
            }
            (_, None) => None,
        };

        let mut data = CreateShareLink {
            horse_id,
            organization_id: ctx.organization_id,
            created_by: ctx.user_id,
            token: generate_token(),
            link_type: req.link_type,
            expires_at,
            password_hash,
            max_views,
            shared_fields,
        };

        let mut attempt = 1;
        let link = loop {
            match self.stores.links.insert(&data).await {
                Ok(link) => break link,
                Err(e) if e.kind == ErrorKind::Conflict && attempt < TOKEN_ATTEMPTS => {
                    warn!(attempt, "Share token collision, drawing a new token");
                    data.token = generate_token();
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        info!(
            user_id = %ctx.user_id,
            organization_id = %ctx.organization_id,
            horse_id = %horse_id,
            share_link_id = %link.id,
            link_type = link.link_type.as_str(),
            "Share link created"
        );

        Ok(self.issued(link))
    }

    /// Lists a horse's share links, newest first.
    pub async fn list_for_horse(
        &self,
        ctx: &RequestContext,
        horse_id: Uuid,
        page: PageRequest,
    ) -> Result<PageResponse<ShareLink>, AppError> {
        self.ensure_horse(ctx, horse_id).await?;
        self.stores
            .links
            .list_for_horse(ctx.organization_id, horse_id, &page)
            .await
    }

    /// Fetches one of the organization's share links.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<IssuedShareLink, AppError> {
        self.find(ctx, id).await.map(|link| self.issued(link))
    }

    async fn find(&self, ctx: &RequestContext, id: Uuid) -> Result<ShareLink, AppError> {
        self.stores
            .links
            .find_by_id(ctx.organization_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Share link not found"))
    }

    /// Deletes a share link and, by cascade, its ledger.
    ///
    /// Members may revoke their own links; owners and admins any link of
    /// the organization.
    pub async fn revoke(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let link = self.find(ctx, id).await?;

        if link.created_by != ctx.user_id && !ctx.is_admin_or_above() {
            return Err(AppError::authorization(
                "Only the creator or an organization admin can revoke this link",
            ));
        }

        if !self.stores.links.delete(ctx.organization_id, id).await? {
            return Err(AppError::not_found("Share link not found"));
        }

        info!(
            user_id = %ctx.user_id,
            organization_id = %ctx.organization_id,
            share_link_id = %id,
            "Share link revoked"
        );
        Ok(())
    }

    /// Lists the view ledger of one of the organization's links, newest first.
    pub async fn list_views(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        page: PageRequest,
    ) -> Result<PageResponse<ShareLinkView>, AppError> {
        let link = self.find(ctx, id).await?;
        self.stores.ledger.list_for_link(link.id, &page).await
    }
}
