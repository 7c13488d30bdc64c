//! # stablehub-api
//!
//! HTTP API layer for StableHub built on Axum.
//!
//! Provides the anonymous share-link endpoints, member-facing link
//! management, signed blob downloads, health checks, middleware, extractors,
//! DTOs and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{RecordStores, build_app, build_state, run_server};
pub use error::ApiError;
pub use state::AppState;
