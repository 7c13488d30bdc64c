//! `Viewer` extractor: collects the anonymous viewer metadata recorded in
//! the share-link ledger.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;

use stablehub_entity::share::ViewerInfo;

use crate::state::AppState;

/// Viewer metadata taken from request headers.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub ViewerInfo);

impl FromRequestParts<AppState> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Viewer(viewer_info(
            parts,
            state.config.server.trust_proxy_headers,
        )))
    }
}

fn viewer_info(parts: &Parts, trust_proxy_headers: bool) -> ViewerInfo {
    let owned = |name: &str| header_str(parts, name).map(String::from);

    ViewerInfo {
        ip_address: client_ip(parts, trust_proxy_headers),
        user_agent: owned(header::USER_AGENT.as_str()),
        referer: owned(header::REFERER.as_str()),
        country: owned("cf-ipcountry").or_else(|| owned("x-vercel-ip-country")),
        city: owned("x-vercel-ip-city"),
        region: owned("x-vercel-ip-country-region"),
    }
}

/// A non-empty header value as `&str`.
pub(crate) fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Client address. Behind a trusted proxy: first `x-forwarded-for` hop,
/// then `x-real-ip`. Otherwise, and as the fallback, the socket peer.
pub(crate) fn client_ip(parts: &Parts, trust_proxy_headers: bool) -> Option<String> {
    let forwarded = || {
        header_str(parts, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| header_str(parts, "x-real-ip"))
            .map(String::from)
    };

    trust_proxy_headers
        .then(forwarded)
        .flatten()
        .or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
}
