//! Share links: anonymous access control, redaction, and member-facing
//! management.

pub mod access;
pub mod error;
#[cfg(test)]
mod fixtures;
pub mod redact;
pub mod service;
pub mod throttle;
pub mod token;

use std::sync::Arc;

use stablehub_core::traits::BlobStore;
use stablehub_database::store::{HorseStore, OrganizationStore, ShareLinkStore, ViewLedger};

pub use access::{ShareLinkAccessController, SharedHorseView, SharedLinkInfo};
pub use error::ShareAccessError;
pub use redact::{RedactedHorse, RedactionBuilder, SharedXray};
pub use service::{CreateShareLinkRequest, IssuedShareLink, ShareLinkService};
pub use throttle::PasswordAttemptThrottle;

/// The stores both share-link services read and write.
#[derive(Debug, Clone)]
pub struct ShareCollaborators {
    /// Share link records.
    pub links: Arc<dyn ShareLinkStore>,
    /// View ledger.
    pub ledger: Arc<dyn ViewLedger>,
    /// Horse records.
    pub horses: Arc<dyn HorseStore>,
    /// Organizations and contacts.
    pub organizations: Arc<dyn OrganizationStore>,
    /// Private asset storage.
    pub blobs: Arc<dyn BlobStore>,
}
