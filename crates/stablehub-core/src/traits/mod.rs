//! Core traits defined in `stablehub-core` and implemented by other crates.

pub mod blob;

pub use blob::BlobStore;
