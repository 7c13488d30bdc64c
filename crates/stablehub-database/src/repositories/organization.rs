//! Organization repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use stablehub_core::error::{AppError, ErrorKind};
use stablehub_core::result::AppResult;
use stablehub_entity::organization::{Organization, OrganizationContact, OrganizationProfile};

use crate::store::OrganizationStore;

/// Repository for organizations and their published contacts.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    /// Create a new organization repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizationStore for OrganizationRepository {
    async fn find_with_contacts(
        &self,
        organization_id: Uuid,
    ) -> AppResult<Option<OrganizationProfile>> {
        let organization = sqlx::query_as::<_, Organization>(
            "SELECT id, name, email, phone, website, logo_url, city, country, created_at \
             FROM organizations WHERE id = $1",
        )
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find organization", e))?;

        let Some(organization) = organization else {
            return Ok(None);
        };

        let contacts = sqlx::query_as::<_, OrganizationContact>(
            "SELECT id, organization_id, name, role, email, phone FROM organization_contacts \
             WHERE organization_id = $1 ORDER BY sort_order, name",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load organization contacts", e)
        })?;

        Ok(Some(OrganizationProfile {
            organization,
            contacts,
        }))
    }
}
