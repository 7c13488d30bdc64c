//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use stablehub_core::error::AppError;
use stablehub_entity::share::{LinkType, SharedField};
use stablehub_service::share::CreateShareLinkRequest;

/// Body of `POST /api/shared/{token}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedPasswordRequest {
    /// The link password.
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `POST /api/horses/{horse_id}/share-links`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateShareLinkBody {
    /// `standard`, `one_time` or `password_protected`.
    pub link_type: LinkType,
    /// Categories to share.
    #[validate(length(min = 1, message = "At least one shared field is required"))]
    pub shared_fields: Vec<SharedField>,
    /// Expiry instant.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Password for `password_protected` links.
    #[serde(default)]
    #[validate(length(max = 256, message = "Password is too long"))]
    pub password: Option<String>,
    /// View cap for `one_time` links.
    #[serde(default)]
    #[validate(range(min = 1, message = "max_views must be at least 1"))]
    pub max_views: Option<i32>,
}

impl CreateShareLinkBody {
    /// Validate and convert into the service request.
    pub fn into_request(self) -> Result<CreateShareLinkRequest, AppError> {
        self.validate()
            .map_err(|e| AppError::validation(format!("Invalid share link request: {e}")))?;

        Ok(CreateShareLinkRequest {
            link_type: self.link_type,
            shared_fields: self.shared_fields,
            expires_at: self.expires_at,
            password: self.password,
            max_views: self.max_views,
        })
    }
}
