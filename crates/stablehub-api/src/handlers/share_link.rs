//! Member-facing share-link management handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::dto::request::CreateShareLinkBody;
use crate::error::ApiError;
use crate::extractors::{AuthMember, Pagination};
use crate::state::AppState;

/// POST /api/horses/{horse_id}/share-links
pub async fn create(
    State(state): State<AppState>,
    auth: AuthMember,
    Path(horse_id): Path<Uuid>,
    Json(body): Json<CreateShareLinkBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let link = state
        .share_service
        .create(&auth, horse_id, body.into_request()?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": link })),
    ))
}

/// GET /api/horses/{horse_id}/share-links
pub async fn list_for_horse(
    State(state): State<AppState>,
    auth: AuthMember,
    Path(horse_id): Path<Uuid>,
    Pagination(page): Pagination,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .share_service
        .list_for_horse(&auth, horse_id, page)
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// GET /api/share-links/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthMember,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let link = state.share_service.get(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": link })))
}

/// DELETE /api/share-links/{id}
pub async fn revoke(
    State(state): State<AppState>,
    auth: AuthMember,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.share_service.revoke(&auth, id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Share link revoked" } }),
    ))
}

/// GET /api/share-links/{id}/views
pub async fn list_views(
    State(state): State<AppState>,
    auth: AuthMember,
    Path(id): Path<Uuid>,
    Pagination(page): Pagination,
) -> Result<Json<serde_json::Value>, ApiError> {
    let views = state
        .share_service
        .list_views(&auth, id, page)
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": views })))
}
