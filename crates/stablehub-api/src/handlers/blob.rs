//! Signed downloads from the local blob store.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::debug;

use stablehub_core::error::AppError;
use stablehub_storage::SignatureError;

use crate::error::ApiError;
use crate::state::AppState;

/// Query string of a signed blob URL.
#[derive(Debug, Deserialize)]
pub struct SignedQuery {
    /// Expiry instant, seconds since the epoch.
    pub expires: i64,
    /// URL-safe base64 HMAC over the path and expiry.
    pub signature: String,
}

/// GET /api/blobs/{*path}?expires=&signature=
pub async fn download(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<SignedQuery>,
) -> Result<Response, ApiError> {
    let Some(store) = state.blobs.local.as_ref() else {
        return Err(AppError::not_found("Blob downloads are not served by this instance").into());
    };

    store
        .verify(&path, query.expires, &query.signature)
        .map_err(|e| {
            debug!(error = %e, "Rejected blob download");
            match e {
                SignatureError::Expired => AppError::authorization("Download link has expired"),
                SignatureError::Invalid | SignatureError::Malformed => {
                    AppError::authorization("Invalid download signature")
                }
            }
        })?;

    let blob = store.open(&path).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, blob.content_type)
        .header(header::CONTENT_LENGTH, blob.size)
        .header(header::CACHE_CONTROL, "private, no-store")
        .body(Body::from_stream(ReaderStream::new(blob.file)))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
