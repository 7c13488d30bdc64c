//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files and `STABLEHUB__`-prefixed environment variables.
//! Each sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod share;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::share::ShareConfig;
pub use self::storage::{LocalStorageConfig, S3StorageConfig, StorageConfig, StorageProviderKind};

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged configuration
/// (default.toml + environment overlay + environment variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session token and password hashing settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Share-link behaviour.
    #[serde(default)]
    pub share: ShareConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default.toml`, `config/{env}.toml` and environment
    /// variables prefixed with `STABLEHUB__` (e.g. `STABLEHUB__DATABASE__URL`).
    /// Every file is optional.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("STABLEHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings that would make the share path unsafe.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.len() < 32 {
            return Err(AppError::configuration(
                "auth.jwt_secret must be at least 32 bytes",
            ));
        }
        if self.storage.provider == StorageProviderKind::Local
            && self.storage.local.signing_secret.len() < 32
        {
            return Err(AppError::configuration(
                "storage.local.signing_secret must be at least 32 bytes",
            ));
        }
        if self.share.one_time_default_max_views < 1 {
            return Err(AppError::configuration(
                "share.one_time_default_max_views must be at least 1",
            ));
        }
        Ok(())
    }
}
