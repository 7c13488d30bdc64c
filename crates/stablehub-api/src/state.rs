//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use stablehub_auth::jwt::JwtDecoder;
use stablehub_core::config::AppConfig;
use stablehub_database::DatabasePool;
use stablehub_service::{ShareLinkAccessController, ShareLinkService};
use stablehub_storage::ConfiguredBlobStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Process start, for uptime reporting
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool, absent when running on in-memory stores
    pub db_pool: Option<DatabasePool>,
    /// Blob store for private assets
    pub blobs: ConfiguredBlobStore,

    // ── Auth ─────────────────────────────────────────────────
    /// Member session token validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Anonymous share-link resolution
    pub share_access: Arc<ShareLinkAccessController>,
    /// Member-facing share-link management
    pub share_service: Arc<ShareLinkService>,
}
