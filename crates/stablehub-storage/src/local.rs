//! Local filesystem blob store.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use tracing::{debug, warn};

use stablehub_core::config::LocalStorageConfig;
use stablehub_core::error::{AppError, ErrorKind};
use stablehub_core::result::AppResult;
use stablehub_core::traits::BlobStore;

use crate::signing::{SignatureError, UrlSigner};

/// An opened blob ready to be streamed to a client.
#[derive(Debug)]
pub struct BlobFile {
    /// Open file handle.
    pub file: fs::File,
    /// Size in bytes.
    pub size: u64,
    /// Guessed MIME type.
    pub content_type: String,
}

/// Blob store rooted at a local directory.
///
/// Signed URLs point at this process's `/api/blobs/{path}` route and carry
/// an HMAC over the path and expiry instant.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
    signer: UrlSigner,
}

impl LocalBlobStore {
    /// Create the store, creating the root directory if needed.
    pub async fn new(config: &LocalStorageConfig, public_base_url: &str) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;

        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            signer: UrlSigner::new(config.signing_secret.as_bytes())?,
        })
    }

    /// Map a blob path to a file under the root, rejecting anything that
    /// could escape it.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path);
        let clean = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !clean {
            return Err(AppError::validation(format!("Invalid blob path: {path}")));
        }
        Ok(self.root.join(relative))
    }

    /// Verify a signed download request against the current time.
    pub fn verify(&self, path: &str, expires: i64, signature: &str) -> Result<(), SignatureError> {
        self.signer
            .verify(path, expires, signature, Utc::now().timestamp())
    }

    /// Open a blob for streaming.
    pub async fn open(&self, path: &str) -> AppResult<BlobFile> {
        let full_path = self.resolve(path)?;
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {path}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to open blob: {path}"), e)
            }
        })?;
        let metadata = file.metadata().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to stat blob: {path}"), e)
        })?;
        if !metadata.is_file() {
            return Err(AppError::not_found(format!("Blob not found: {path}")));
        }

        Ok(BlobFile {
            file,
            size: metadata.len(),
            content_type: mime_guess::from_path(&full_path)
                .first_or_octet_stream()
                .to_string(),
        })
    }

    /// Write a blob, creating parent directories as needed.
    pub async fn put(&self, path: &str, data: &[u8]) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        fs::write(&full_path, data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write blob: {path}"), e)
        })?;
        debug!(path, bytes = data.len(), "Wrote blob");
        Ok(())
    }
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn create_signed_url(&self, path: &str, ttl: Duration) -> AppResult<String> {
        self.resolve(path)?;
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::validation(format!("Invalid signed URL lifetime: {e}")))?;
        let expires = (Utc::now() + ttl).timestamp();
        let signature = self.signer.sign(path, expires);

        Ok(format!(
            "{}/api/blobs/{}?expires={expires}&signature={signature}",
            self.public_base_url,
            encode_path(path)
        ))
    }

    async fn remove(&self, paths: &[String]) -> AppResult<()> {
        for path in paths {
            let full_path = self.resolve(path)?;
            match fs::remove_file(&full_path).await {
                Ok(()) => debug!(path = %path, "Removed blob"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(path = %path, "Blob already absent");
                }
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to remove blob: {path}"),
                        e,
                    ));
                }
            }
        }
        Ok(())
    }
}
