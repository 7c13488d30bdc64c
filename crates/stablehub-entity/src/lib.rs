//! # stablehub-entity
//!
//! Domain entity models for StableHub. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities additionally derive `sqlx::FromRow` where their columns map
//! one-to-one.

pub mod horse;
pub mod member;
pub mod organization;
pub mod share;
