//! # stablehub-storage
//!
//! Blob store implementations for privately uploaded assets. The local
//! filesystem store issues HMAC-signed download URLs served by the API; the
//! S3 store (feature `s3`) issues presigned object URLs.

pub mod factory;
pub mod local;
#[cfg(feature = "s3")]
pub mod s3;
pub mod signing;

pub use factory::{ConfiguredBlobStore, build_blob_store};
pub use local::{BlobFile, LocalBlobStore};
pub use signing::{SignatureError, UrlSigner};
