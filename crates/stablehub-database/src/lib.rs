//! # stablehub-database
//!
//! Record-store traits for the share-link path, their PostgreSQL
//! implementations, and an in-memory implementation for single-node
//! development and tests.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{HorseStore, OrganizationStore, ShareLinkStore, ViewClaim, ViewLedger};
