//! Route definitions for the StableHub HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

/// Build the API routes, with `state` threaded through every handler.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(shared_routes())
        .merge(share_link_routes())
        .merge(blob_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Anonymous share-link resolution
fn shared_routes() -> Router<AppState> {
    Router::new().route(
        "/shared/{token}",
        get(handlers::shared::resolve).post(handlers::shared::resolve_with_password),
    )
}

/// Member-facing share-link management
fn share_link_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/horses/{horse_id}/share-links",
            get(handlers::share_link::list_for_horse).post(handlers::share_link::create),
        )
        .route(
            "/share-links/{id}",
            get(handlers::share_link::get).delete(handlers::share_link::revoke),
        )
        .route(
            "/share-links/{id}/views",
            get(handlers::share_link::list_views),
        )
}

/// Signed downloads from the local blob store
fn blob_routes() -> Router<AppState> {
    Router::new().route("/blobs/{*path}", get(handlers::blob::download))
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
