//! PostgreSQL implementations of the record-store traits.

pub mod horse;
pub mod organization;
pub mod share_link;
pub mod share_view;

pub use horse::HorseRepository;
pub use organization::OrganizationRepository;
pub use share_link::ShareLinkRepository;
pub use share_view::ShareViewRepository;
