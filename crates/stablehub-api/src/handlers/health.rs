//! Health check handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::dto::response::{ApiResponse, ComponentHealth, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<DetailedHealthResponse>>) {
    let database = match &state.db_pool {
        Some(pool) => component(pool.health_check().await, None),
        None => ComponentHealth {
            status: "not_configured".to_string(),
            provider: Some("memory".to_string()),
        },
    };
    let storage = component(
        state.blobs.store.health_check().await,
        Some(state.blobs.store.provider_type().to_string()),
    );

    let healthy = database.status != "unavailable" && storage.status != "unavailable";
    let (status, label) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(ApiResponse::ok(DetailedHealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database,
            storage,
        })),
    )
}

fn component(
    check: Result<bool, stablehub_core::error::AppError>,
    provider: Option<String>,
) -> ComponentHealth {
    let status = match check {
        Ok(true) => "ok",
        Ok(false) => "unavailable",
        Err(e) => {
            warn!(error = %e, "Health check failed");
            "unavailable"
        }
    };
    ComponentHealth {
        status: status.to_string(),
        provider,
    }
}
