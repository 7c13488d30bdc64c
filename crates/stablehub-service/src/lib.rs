//! # stablehub-service
//!
//! Business logic for StableHub share links. Services follow constructor
//! injection: every store, the blob store and the password hasher are
//! provided at construction time as `Arc` references.

pub mod context;
pub mod share;

pub use context::RequestContext;
pub use share::{ShareAccessError, ShareCollaborators, ShareLinkAccessController, ShareLinkService};
