//! Share link view ledger entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Request metadata describing an anonymous viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerInfo {
    /// Client IP address (first forwarded hop when behind a proxy).
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Referer header value.
    pub referer: Option<String>,
    /// ISO country code from the edge geolocation headers.
    pub country: Option<String>,
    /// City from the edge geolocation headers.
    pub city: Option<String>,
    /// Region from the edge geolocation headers.
    pub region: Option<String>,
}

/// One successful resolution of a share link. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareLinkView {
    /// Entry identifier.
    pub id: Uuid,
    /// The resolved link.
    pub share_link_id: Uuid,
    /// When access was granted.
    pub viewed_at: DateTime<Utc>,
    /// Viewer IP address.
    pub ip_address: Option<String>,
    /// Viewer User-Agent.
    pub user_agent: Option<String>,
    /// Viewer Referer.
    pub referer: Option<String>,
    /// Viewer country.
    pub country: Option<String>,
    /// Viewer city.
    pub city: Option<String>,
    /// Viewer region.
    pub region: Option<String>,
}

/// Data required to append a ledger entry.
#[derive(Debug, Clone)]
pub struct NewShareLinkView {
    /// The resolved link.
    pub share_link_id: Uuid,
    /// When access was granted.
    pub viewed_at: DateTime<Utc>,
    /// Viewer metadata.
    pub viewer: ViewerInfo,
}

impl NewShareLinkView {
    /// Build a ledger entry for a link resolved at `viewed_at`.
    pub fn new(share_link_id: Uuid, viewer: ViewerInfo, viewed_at: DateTime<Utc>) -> Self {
        Self {
            share_link_id,
            viewed_at,
            viewer,
        }
    }

    /// Materialize the stored row with the given identifier.
    pub fn into_view(self, id: Uuid) -> ShareLinkView {
        ShareLinkView {
            id,
            share_link_id: self.share_link_id,
            viewed_at: self.viewed_at,
            ip_address: self.viewer.ip_address,
            user_agent: self.viewer.user_agent,
            referer: self.viewer.referer,
            country: self.viewer.country,
            city: self.viewer.city,
            region: self.viewer.region,
        }
    }
}
