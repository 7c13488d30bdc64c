//! Share link repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use stablehub_core::error::{AppError, ErrorKind};
use stablehub_core::result::AppResult;
use stablehub_core::types::pagination::{PageRequest, PageResponse};
use stablehub_entity::share::{CreateShareLink, ShareLink};

use crate::store::{ShareLinkStore, ViewClaim};

/// Repository for share link lookup, creation and view counting.
#[derive(Debug, Clone)]
pub struct ShareLinkRepository {
    pool: PgPool,
}

impl ShareLinkRepository {
    /// Create a new share link repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareLinkStore for ShareLinkRepository {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>("SELECT * FROM share_links WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find share link by token", e)
            })
    }

    async fn find_by_id(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<ShareLink>> {
        sqlx::query_as::<_, ShareLink>(
            "SELECT * FROM share_links WHERE id = $1 AND organization_id = $2",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share link", e))
    }

    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink> {
        sqlx::query_as::<_, ShareLink>(
            "INSERT INTO share_links (horse_id, organization_id, created_by, token, link_type, \
             expires_at, password_hash, max_views, shared_fields) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(data.horse_id)
        .bind(data.organization_id)
        .bind(data.created_by)
        .bind(&data.token)
        .bind(data.link_type)
        .bind(data.expires_at)
        .bind(&data.password_hash)
        .bind(data.max_views)
        .bind(data.shared_fields.to_strings())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let unique = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique {
                AppError::with_source(ErrorKind::Conflict, "Share link token already exists", e)
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create share link", e)
            }
        })
    }

    async fn delete(&self, organization_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM share_links WHERE id = $1 AND organization_id = $2")
                .bind(id)
                .bind(organization_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete share link", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_horse(
        &self,
        organization_id: Uuid,
        horse_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLink>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM share_links WHERE horse_id = $1 AND organization_id = $2",
        )
        .bind(horse_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count share links", e))?;

        let links = sqlx::query_as::<_, ShareLink>(
            "SELECT * FROM share_links WHERE horse_id = $1 AND organization_id = $2 \
             ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4",
        )
        .bind(horse_id)
        .bind(organization_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list share links", e))?;

        Ok(PageResponse::new(
            links,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn claim_view(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<ViewClaim> {
        let claimed = sqlx::query_as::<_, ShareLink>(
            "UPDATE share_links SET view_count = view_count + 1, last_viewed_at = $2 \
             WHERE id = $1 AND expires_at > $2 \
             AND (max_views IS NULL OR view_count < max_views) \
             RETURNING *",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim share view", e))?;

        if let Some(link) = claimed {
            return Ok(ViewClaim::Claimed(link));
        }

        // The conditional update matched nothing; find out which predicate failed.
        let current = sqlx::query_as::<_, ShareLink>("SELECT * FROM share_links WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to re-read share link", e)
            })?;

        Ok(match current {
            None => ViewClaim::Missing,
            Some(link) if link.is_expired_at(now) => ViewClaim::Expired,
            Some(_) => ViewClaim::Exhausted,
        })
    }
}
