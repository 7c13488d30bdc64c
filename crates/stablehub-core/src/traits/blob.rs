//! Blob store trait for private uploaded assets.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for object stores holding privately uploaded assets (X-ray images,
/// DICOM files).
///
/// Assets are never served directly; viewers receive time-limited signed
/// URLs. Implementations live in `stablehub-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the store is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Issue a URL granting read access to `path` for `ttl`.
    async fn create_signed_url(&self, path: &str, ttl: Duration) -> AppResult<String>;

    /// Remove the objects at the given paths. Missing objects are ignored.
    async fn remove(&self, paths: &[String]) -> AppResult<()>;
}
