//! View ledger repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use stablehub_core::error::{AppError, ErrorKind};
use stablehub_core::result::AppResult;
use stablehub_core::types::pagination::{PageRequest, PageResponse};
use stablehub_entity::share::{NewShareLinkView, ShareLinkView};

use crate::store::ViewLedger;

/// Repository for the append-only `share_link_views` table.
#[derive(Debug, Clone)]
pub struct ShareViewRepository {
    pool: PgPool,
}

impl ShareViewRepository {
    /// Create a new view ledger repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ViewLedger for ShareViewRepository {
    async fn append(&self, view: &NewShareLinkView) -> AppResult<ShareLinkView> {
        sqlx::query_as::<_, ShareLinkView>(
            "INSERT INTO share_link_views (share_link_id, viewed_at, ip_address, user_agent, \
             referer, country, city, region) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(view.share_link_id)
        .bind(view.viewed_at)
        .bind(&view.viewer.ip_address)
        .bind(&view.viewer.user_agent)
        .bind(&view.viewer.referer)
        .bind(&view.viewer.country)
        .bind(&view.viewer.city)
        .bind(&view.viewer.region)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record share view", e))
    }

    async fn list_for_link(
        &self,
        share_link_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLinkView>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM share_link_views WHERE share_link_id = $1")
                .bind(share_link_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count share views", e)
                })?;

        let views = sqlx::query_as::<_, ShareLinkView>(
            "SELECT * FROM share_link_views WHERE share_link_id = $1 \
             ORDER BY viewed_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(share_link_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list share views", e))?;

        Ok(PageResponse::new(
            views,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
