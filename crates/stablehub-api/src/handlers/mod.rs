//! Request handlers, one module per API area.

pub mod blob;
pub mod health;
pub mod share_link;
pub mod shared;
