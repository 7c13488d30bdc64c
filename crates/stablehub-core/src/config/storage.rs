//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Which blob store backs uploaded assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderKind {
    /// Local filesystem with HMAC-signed download URLs served by this process.
    #[default]
    Local,
    /// S3-compatible object store with presigned URLs.
    S3,
}

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Active provider.
    #[serde(default)]
    pub provider: StorageProviderKind,
    /// Validity of signed URLs handed to share-link viewers (default 24 h).
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_seconds: u64,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProviderKind::Local,
            signed_url_ttl_seconds: default_signed_url_ttl(),
            local: LocalStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for stored objects.
    #[serde(default = "default_local_root")]
    pub root_path: String,
    /// HMAC key for signed download URLs.
    #[serde(default = "default_signing_secret")]
    pub signing_secret: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
            signing_secret: default_signing_secret(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO).
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Bucket holding uploaded assets.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
        }
    }
}

fn default_signed_url_ttl() -> u64 {
    86_400
}

fn default_local_root() -> String {
    "./data/blobs".to_string()
}

fn default_signing_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION_fedcba9876543210".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}
