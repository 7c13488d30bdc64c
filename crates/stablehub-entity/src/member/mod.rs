//! Organization membership.

pub mod role;

pub use role::MemberRole;
