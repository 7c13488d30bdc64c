//! Blob store selection from configuration.

use std::sync::Arc;

use tracing::info;

use stablehub_core::config::{StorageConfig, StorageProviderKind};
use stablehub_core::result::AppResult;
use stablehub_core::traits::BlobStore;

use crate::local::LocalBlobStore;

/// The configured blob store, plus the local store when it is the active
/// one (the API serves its signed downloads).
#[derive(Debug, Clone)]
pub struct ConfiguredBlobStore {
    /// Store used for signing and removal.
    pub store: Arc<dyn BlobStore>,
    /// Set when `storage.provider = "local"`.
    pub local: Option<Arc<LocalBlobStore>>,
}

/// Build the blob store named by `storage.provider`.
pub async fn build_blob_store(
    config: &StorageConfig,
    public_base_url: &str,
) -> AppResult<ConfiguredBlobStore> {
    match config.provider {
        StorageProviderKind::Local => {
            let local = Arc::new(LocalBlobStore::new(&config.local, public_base_url).await?);
            info!(root = %config.local.root_path, "Using local blob store");
            Ok(ConfiguredBlobStore {
                store: local.clone(),
                local: Some(local),
            })
        }
        #[cfg(feature = "s3")]
        StorageProviderKind::S3 => {
            let s3 = crate::s3::S3BlobStore::new(&config.s3).await?;
            Ok(ConfiguredBlobStore {
                store: Arc::new(s3),
                local: None,
            })
        }
        #[cfg(not(feature = "s3"))]
        StorageProviderKind::S3 => Err(stablehub_core::error::AppError::configuration(
            "storage.provider = \"s3\" requires the `s3` feature",
        )),
    }
}
