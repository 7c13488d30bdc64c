//! Application builder: wires stores, services, router and middleware into
//! an Axum app, and runs the server.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use tokio::sync::watch;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use stablehub_auth::jwt::JwtDecoder;
use stablehub_auth::password::{PasswordHasher, SharePasswordPolicy};
use stablehub_core::config::AppConfig;
use stablehub_core::error::AppError;
use stablehub_database::memory::MemoryStore;
use stablehub_database::repositories::{
    HorseRepository, OrganizationRepository, ShareLinkRepository, ShareViewRepository,
};
use stablehub_database::DatabasePool;
use stablehub_database::store::{HorseStore, OrganizationStore, ShareLinkStore, ViewLedger};
use stablehub_service::{ShareCollaborators, ShareLinkAccessController, ShareLinkService};
use stablehub_storage::{ConfiguredBlobStore, build_blob_store};

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::{request_logging, request_span};
use crate::router::build_router;
use crate::state::AppState;

/// The record stores behind the share-link services.
#[derive(Debug, Clone)]
pub struct RecordStores {
    /// Share link records.
    pub links: Arc<dyn ShareLinkStore>,
    /// View ledger.
    pub ledger: Arc<dyn ViewLedger>,
    /// Horse records.
    pub horses: Arc<dyn HorseStore>,
    /// Organizations and contacts.
    pub organizations: Arc<dyn OrganizationStore>,
}

impl RecordStores {
    /// PostgreSQL-backed repositories sharing one pool.
    pub fn postgres(db_pool: &DatabasePool) -> Self {
        let pool = db_pool.pool().clone();
        Self {
            links: Arc::new(ShareLinkRepository::new(pool.clone())),
            ledger: Arc::new(ShareViewRepository::new(pool.clone())),
            horses: Arc::new(HorseRepository::new(pool.clone())),
            organizations: Arc::new(OrganizationRepository::new(pool)),
        }
    }

    /// A single in-memory store serving every role.
    pub fn memory(store: &MemoryStore) -> Self {
        Self {
            links: Arc::new(store.clone()),
            ledger: Arc::new(store.clone()),
            horses: Arc::new(store.clone()),
            organizations: Arc::new(store.clone()),
        }
    }
}

/// Construct the application state from its infrastructure.
pub fn build_state(
    config: AppConfig,
    db_pool: Option<DatabasePool>,
    records: RecordStores,
    blobs: ConfiguredBlobStore,
) -> Result<AppState, AppError> {
    let password_hasher = Arc::new(PasswordHasher::new(&config.auth)?);
    let password_policy = SharePasswordPolicy::new(&config.auth);
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    let collaborators = ShareCollaborators {
        links: records.links,
        ledger: records.ledger,
        horses: records.horses,
        organizations: records.organizations,
        blobs: Arc::clone(&blobs.store),
    };

    let share_access = Arc::new(ShareLinkAccessController::new(
        collaborators.clone(),
        Arc::clone(&password_hasher),
        &config.share,
        &config.storage,
    ));
    let share_service = Arc::new(ShareLinkService::new(
        collaborators,
        password_hasher,
        password_policy,
        config.share.clone(),
        &config.server.public_base_url,
    ));

    Ok(AppState {
        config: Arc::new(config),
        started_at: Instant::now(),
        db_pool,
        blobs,
        jwt_decoder,
        share_access,
        share_service,
    })
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let server = &state.config.server;
    let max_body = server.max_body_bytes;
    let timeout = Duration::from_secs(server.request_timeout_seconds);
    let cors = build_cors_layer(&server.cors);

    build_router(state)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
}

/// Runs the StableHub server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db_pool: DatabasePool) -> Result<(), AppError> {
    info!("Starting StableHub server");

    let blobs = build_blob_store(&config.storage, &config.server.public_base_url).await?;
    info!(provider = blobs.store.provider_type(), "Blob store ready");

    let records = RecordStores::postgres(&db_pool);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = build_state(config, Some(db_pool.clone()), records, blobs)?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(addr = %addr, "StableHub server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    })
    .into_future();

    // In-flight requests get `grace` to finish once shutdown starts.
    let deadline = async move {
        let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = deadline => {
            warn!(grace_seconds = grace.as_secs(), "Shutdown grace elapsed, dropping open connections");
        }
    }

    db_pool.close().await;
    info!("StableHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
