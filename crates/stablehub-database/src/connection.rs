//! PostgreSQL pool shared by the share-link, ledger, horse and organization
//! repositories.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use stablehub_core::config::DatabaseConfig;
use stablehub_core::error::{AppError, ErrorKind};
use stablehub_core::result::AppResult;

/// Handle to the record database.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open a pool sized by the `database` section and, when
    /// `run_migrations` is set, bring the schema up to date.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!(
            url = %redact_credentials(&config.url),
            max_connections = config.max_connections,
            "Opening PostgreSQL pool"
        );

        let pool = pool_options(config)
            .connect(&config.url)
            .await
            .map_err(|e| database_error("Failed to connect to database", e))?;
        let db = Self { pool };

        if config.run_migrations {
            db.migrate().await?;
        }
        Ok(db)
    }

    /// The underlying sqlx pool, for repositories.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| database_error("Failed to run migrations", e))?;
        info!("Share-link schema is up to date");
        Ok(())
    }

    /// Round-trip a trivial query; used by the detailed health endpoint.
    pub async fn health_check(&self) -> AppResult<bool> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| true)
            .map_err(|e| database_error("Database health check failed", e))
    }

    /// Wait for checked-out connections and close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
}

fn database_error<E>(context: &str, source: E) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    AppError::with_source(ErrorKind::Database, format!("{context}: {source}"), source)
}

/// Hide the password of a connection URL in log output.
fn redact_credentials(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:****@{host}"),
        None => url.to_string(),
    }
}
