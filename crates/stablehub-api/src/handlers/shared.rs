//! Anonymous share-link resolution handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::dto::request::SharedPasswordRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::Viewer;
use crate::state::AppState;

/// GET /api/shared/{token}
pub async fn resolve(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Viewer(viewer): Viewer,
) -> Result<impl IntoResponse, ApiError> {
    let view = state.share_access.resolve(&token, None, &viewer).await?;
    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(ApiResponse::ok(view)),
    ))
}

/// POST /api/shared/{token} with `{ "password": … }`
pub async fn resolve_with_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Viewer(viewer): Viewer,
    Json(req): Json<SharedPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .share_access
        .resolve(&token, req.password.as_deref(), &viewer)
        .await?;
    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(ApiResponse::ok(view)),
    ))
}
