//! Anonymous share-link resolution.
//!
//! Checks run in a fixed order, and the first failing check decides the
//! outcome:
//!
//! 1. no link matches the token → `NotFound`
//! 2. `now >= expires_at` → `Expired`
//! 3. one-time link with no views left → `Exhausted`
//! 4. password protected, no password supplied → `PasswordRequired`
//! 5. password protected, wrong password → `PasswordInvalid`
//!
//! Otherwise a view is claimed atomically in the store, the horse is
//! redacted, and a ledger entry is written on a best-effort basis.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use stablehub_auth::password::PasswordHasher;
use stablehub_core::config::{ShareConfig, StorageConfig};
use stablehub_core::error::AppError;
use stablehub_database::store::ViewClaim;
use stablehub_entity::organization::{Organization, OrganizationContact};
use stablehub_entity::share::{
    LinkType, NewShareLinkView, ShareLink, SharedFieldSet, ViewerInfo,
};

use super::ShareCollaborators;
use super::error::ShareAccessError;
use super::redact::{RedactedHorse, RedactionBuilder};
use super::throttle::PasswordAttemptThrottle;
use super::token;

/// What a viewer receives for a granted share link.
#[derive(Debug, Clone, Serialize)]
pub struct SharedHorseView {
    /// The redacted horse record.
    pub horse: RedactedHorse,
    /// The owning organization.
    pub organization: Organization,
    /// The organization's published contacts.
    pub contacts: Vec<OrganizationContact>,
    /// Public facts about the link itself.
    pub link: SharedLinkInfo,
}

/// Link metadata that is safe to show to the viewer.
#[derive(Debug, Clone, Serialize)]
pub struct SharedLinkInfo {
    pub link_type: LinkType,
    pub expires_at: DateTime<Utc>,
    pub shared_fields: SharedFieldSet,
}

impl From<&ShareLink> for SharedLinkInfo {
    fn from(link: &ShareLink) -> Self {
        Self {
            link_type: link.link_type,
            expires_at: link.expires_at,
            shared_fields: link.shared_fields.clone(),
        }
    }
}

/// Resolves share tokens into redacted horse views.
#[derive(Debug, Clone)]
pub struct ShareLinkAccessController {
    stores: ShareCollaborators,
    hasher: Arc<PasswordHasher>,
    throttle: PasswordAttemptThrottle,
    signed_url_ttl: Duration,
    ledger_timeout: Duration,
}

impl ShareLinkAccessController {
    /// Creates a new access controller.
    pub fn new(
        stores: ShareCollaborators,
        hasher: Arc<PasswordHasher>,
        share: &ShareConfig,
        storage: &StorageConfig,
    ) -> Self {
        Self {
            stores,
            hasher,
            throttle: PasswordAttemptThrottle::new(
                share.max_password_attempts,
                share.max_password_attempts_per_link,
                Duration::from_secs(share.password_attempt_window_seconds),
            ),
            signed_url_ttl: Duration::from_secs(storage.signed_url_ttl_seconds),
            ledger_timeout: Duration::from_millis(share.ledger_write_timeout_ms),
        }
    }

    /// Resolve `token` (plus an optional password) for an anonymous viewer.
    pub async fn resolve(
        &self,
        token: &str,
        password: Option<&str>,
        viewer: &ViewerInfo,
    ) -> Result<SharedHorseView, ShareAccessError> {
        if !token::is_well_formed(token) {
            return Err(ShareAccessError::NotFound);
        }

        let link = self
            .stores
            .links
            .find_by_token(token)
            .await
            .map_err(upstream)?
            .ok_or(ShareAccessError::NotFound)?;

        if link.is_expired_at(Utc::now()) {
            debug!(share_link_id = %link.id, "Share link expired");
            return Err(ShareAccessError::Expired);
        }
        if link.is_exhausted() {
            debug!(share_link_id = %link.id, "Share link exhausted");
            return Err(ShareAccessError::Exhausted);
        }
        if link.requires_password() {
            self.check_password(&link, password, viewer.ip_address.as_deref())
                .await?;
        }

        let link = match self
            .stores
            .links
            .claim_view(link.id, Utc::now())
            .await
            .map_err(upstream)?
        {
            ViewClaim::Claimed(link) => link,
            ViewClaim::Exhausted => return Err(ShareAccessError::Exhausted),
            ViewClaim::Expired => return Err(ShareAccessError::Expired),
            ViewClaim::Missing => return Err(ShareAccessError::NotFound),
        };

        let (horse, profile) = tokio::try_join!(
            self.stores
                .horses
                .find_in_organization(link.organization_id, link.horse_id),
            self.stores
                .organizations
                .find_with_contacts(link.organization_id),
        )
        .map_err(upstream)?;

        let (Some(horse), Some(profile)) = (horse, profile) else {
            warn!(
                share_link_id = %link.id,
                horse_id = %link.horse_id,
                organization_id = %link.organization_id,
                "Share link points at a missing horse or organization"
            );
            return Err(ShareAccessError::NotFound);
        };

        let redacted = RedactionBuilder::new(&horse)
            .include_all(&link.shared_fields)
            .finish(self.stores.blobs.as_ref(), self.signed_url_ttl)
            .await;

        self.record_view(&link, viewer).await;

        info!(
            share_link_id = %link.id,
            horse_id = %link.horse_id,
            organization_id = %link.organization_id,
            link_type = link.link_type.as_str(),
            view_count = link.view_count,
            "Share link resolved"
        );

        Ok(SharedHorseView {
            horse: redacted,
            organization: profile.organization,
            contacts: profile.contacts,
            link: SharedLinkInfo::from(&link),
        })
    }

    async fn check_password(
        &self,
        link: &ShareLink,
        password: Option<&str>,
        ip: Option<&str>,
    ) -> Result<(), ShareAccessError> {
        let Some(password) = password.filter(|p| !p.is_empty()) else {
            return Err(ShareAccessError::PasswordRequired);
        };
        let Some(hash) = link.password_hash.clone() else {
            return Err(ShareAccessError::Upstream(AppError::internal(format!(
                "Password-protected share link {} has no password hash",
                link.id
            ))));
        };

        if self.throttle.is_locked(&link.token, ip).await {
            warn!(share_link_id = %link.id, "Share password attempt refused by throttle");
            return Err(ShareAccessError::TooManyAttempts);
        }

        let hasher = self.hasher.clone();
        let candidate = password.to_string();
        let matches = tokio::task::spawn_blocking(move || hasher.verify_password(&candidate, &hash))
            .await
            .map_err(|e| {
                ShareAccessError::Upstream(AppError::internal(format!(
                    "Password verification task failed: {e}"
                )))
            })?
            .map_err(upstream)?;

        if matches {
            self.throttle.clear(&link.token, ip).await;
            Ok(())
        } else {
            let failures = self.throttle.record_failure(&link.token, ip).await;
            debug!(share_link_id = %link.id, failures, "Share password rejected");
            Err(ShareAccessError::PasswordInvalid)
        }
    }

    /// Append a ledger entry. Failures and timeouts are logged, never
    /// surfaced, never retried.
    async fn record_view(&self, link: &ShareLink, viewer: &ViewerInfo) {
        let entry = NewShareLinkView::new(
            link.id,
            viewer.clone(),
            link.last_viewed_at.unwrap_or_else(Utc::now),
        );
        match tokio::time::timeout(self.ledger_timeout, self.stores.ledger.append(&entry)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                warn!(share_link_id = %link.id, error = %e, "Failed to record share view");
            }
            Err(_) => {
                warn!(
                    share_link_id = %link.id,
                    timeout_ms = self.ledger_timeout.as_millis() as u64,
                    "Share view ledger write timed out"
                );
            }
        }
    }
}

fn upstream(err: AppError) -> ShareAccessError {
    warn!(error = %err, kind = %err.kind, "Share link backing store failed");
    ShareAccessError::Upstream(err)
}
