//! Session-token issuance.
//!
//! Production tokens come from the external auth service. This encoder
//! exists for operational tooling and the integration suite and signs with
//! the same shared secret.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use stablehub_core::config::AuthConfig;
use stablehub_core::error::AppError;
use stablehub_entity::member::MemberRole;

use super::claims::Claims;

/// Creates signed HS256 session tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// Issue a token for `user_id` acting in `organization_id` with `role`.
    pub fn issue(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        role: MemberRole,
        ttl: chrono::Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            org: organization_id,
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))
    }
}
