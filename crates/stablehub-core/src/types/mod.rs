//! Core type definitions used across the StableHub workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
