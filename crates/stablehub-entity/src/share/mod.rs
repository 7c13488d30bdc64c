//! Share-link domain entities.

pub mod field;
pub mod model;
pub mod view;

pub use field::{SharedField, SharedFieldSet, UnknownSharedField};
pub use model::{CreateShareLink, LinkType, ShareLink};
pub use view::{NewShareLinkView, ShareLinkView, ViewerInfo};
