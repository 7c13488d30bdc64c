//! Share link entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::field::SharedFieldSet;

/// Kind of share link. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_link_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Usable any number of times until it expires.
    Standard,
    /// Usable `max_views` times (default once).
    OneTime,
    /// Requires a password on every resolution.
    PasswordProtected,
}

impl LinkType {
    /// Return the wire/database name of the link type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::OneTime => "one_time",
            Self::PasswordProtected => "password_protected",
        }
    }
}

/// A token-addressable, redacted read view of one horse record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareLink {
    /// Unique link identifier (internal, never used for lookup by viewers).
    pub id: Uuid,
    /// The shared horse.
    pub horse_id: Uuid,
    /// The organization owning the horse and the link.
    pub organization_id: Uuid,
    /// The member who created the link.
    pub created_by: Uuid,
    /// Opaque 64-hex-character lookup key.
    pub token: String,
    /// Kind of link.
    pub link_type: LinkType,
    /// Instant at and after which the link is unusable.
    pub expires_at: DateTime<Utc>,
    /// Argon2id PHC string for password-protected links.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Successful resolutions so far.
    pub view_count: i32,
    /// Resolution cap for one-time links.
    pub max_views: Option<i32>,
    /// Authorized attribute categories.
    #[sqlx(try_from = "Vec<String>")]
    pub shared_fields: SharedFieldSet,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    /// Last successful resolution.
    pub last_viewed_at: Option<DateTime<Utc>>,
}

impl ShareLink {
    /// Whether the link has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether a one-time link has used up its views.
    pub fn is_exhausted(&self) -> bool {
        match (self.link_type, self.max_views) {
            (LinkType::OneTime, Some(max)) => self.view_count >= max,
            _ => false,
        }
    }

    /// Whether the link requires a password.
    pub fn requires_password(&self) -> bool {
        self.link_type == LinkType::PasswordProtected
    }
}

/// Data required to persist a new share link.
#[derive(Debug, Clone)]
pub struct CreateShareLink {
    /// The shared horse.
    pub horse_id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Creating member.
    pub created_by: Uuid,
    /// Generated token.
    pub token: String,
    /// Kind of link.
    pub link_type: LinkType,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Hash for password-protected links.
    pub password_hash: Option<String>,
    /// View cap for one-time links.
    pub max_views: Option<i32>,
    /// Authorized categories.
    pub shared_fields: SharedFieldSet,
}
