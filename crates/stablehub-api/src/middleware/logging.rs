//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Span, info, info_span, warn};

/// Logs request method, path, status, and duration.
///
/// Share tokens appear in `/api/shared/{token}` paths, so that segment is
/// masked before logging.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = mask_share_token(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(method = %method, path = %path, status, duration_ms, "HTTP request");
    } else {
        info!(method = %method, path = %path, status, duration_ms, "HTTP request");
    }

    response
}

/// Span for `TraceLayer`, carrying the masked path instead of the raw URI.
pub fn request_span(request: &Request) -> Span {
    info_span!(
        "request",
        method = %request.method(),
        path = %mask_share_token(request.uri().path()),
    )
}

fn mask_share_token(path: &str) -> String {
    match path.strip_prefix("/api/shared/") {
        Some(rest) if !rest.is_empty() => "/api/shared/{token}".to_string(),
        _ => path.to_string(),
    }
}
