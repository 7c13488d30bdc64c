//! `Pagination` extractor for the share-link and view-ledger listings.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use stablehub_core::error::AppError;
use stablehub_core::types::pagination::PageRequest;

use crate::error::ApiError;

/// `?page=&per_page=` query, clamped into a `PageRequest`.
#[derive(Debug, Clone)]
pub struct Pagination(pub PageRequest);

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    page: Option<u64>,
    per_page: Option<u64>,
}

impl<S: Send + Sync> FromRequestParts<S> for Pagination {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::try_from_uri(&parts.uri).map_err(|e| {
            AppError::validation(format!("Invalid pagination parameters: {}", e.body_text()))
        })?;

        let defaults = PageRequest::default();
        Ok(Pagination(PageRequest::new(
            query.page.unwrap_or(defaults.page),
            query.per_page.unwrap_or(defaults.page_size),
        )))
    }
}
