//! `AuthMember` extractor: pulls the session token from the Authorization
//! header, validates it, and injects the member's context.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use stablehub_core::error::AppError;
use stablehub_service::RequestContext;

use crate::error::ApiError;
use crate::extractors::viewer::{client_ip, header_str};
use crate::state::AppState;

/// Extracted authenticated member context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthMember(pub RequestContext);

impl AuthMember {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthMember {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthMember {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = header_str(parts, header::AUTHORIZATION.as_str())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = state.jwt_decoder.decode(token)?;

        let ctx = RequestContext::new(
            claims.user_id(),
            claims.organization_id(),
            claims.role,
            client_ip(parts, state.config.server.trust_proxy_headers),
            header_str(parts, header::USER_AGENT.as_str()).map(String::from),
        );

        Ok(AuthMember(ctx))
    }
}
