//! Custom Axum extractors.

pub mod auth;
pub mod pagination;
pub mod viewer;

pub use auth::AuthMember;
pub use pagination::Pagination;
pub use viewer::Viewer;
