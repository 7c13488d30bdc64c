//! S3-compatible blob store issuing presigned URLs.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use tracing::{info, warn};

use stablehub_core::config::S3StorageConfig;
use stablehub_core::error::{AppError, ErrorKind};
use stablehub_core::result::AppResult;
use stablehub_core::traits::BlobStore;

/// Blob store backed by an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    /// Build a client from the `storage.s3` configuration section.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("storage.s3.bucket must be set"));
        }
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 blob store"
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "stablehub-config",
            ));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(&config.endpoint).force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(bucket = %self.bucket, error = %e, "S3 health check failed");
                Ok(false)
            }
        }
    }

    async fn create_signed_url(&self, path: &str, ttl: Duration) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(ttl).map_err(|e| {
            AppError::with_source(ErrorKind::Validation, "Invalid presigned URL lifetime", e)
        })?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .presigned(presigning)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, format!("Failed to presign {path}"), e)
            })?;
        Ok(request.uri().to_string())
    }

    async fn remove(&self, paths: &[String]) -> AppResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let objects = paths
            .iter()
            .map(|p| ObjectIdentifier::builder().key(p).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Invalid object key", e))?;
        let delete = Delete::builder()
            .set_objects(Some(objects))
            .quiet(true)
            .build()
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Invalid delete request", e))?;

        self.client
            .delete_objects()
            .bucket(&self.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to remove S3 objects", e)
            })?;
        Ok(())
    }
}
