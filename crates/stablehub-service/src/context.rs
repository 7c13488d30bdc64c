//! Request context carrying the authenticated member's identity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use stablehub_entity::member::MemberRole;

/// Contextual information about the member making a request.
///
/// Built by the API layer from a validated session token and passed
/// explicitly to every member-facing service call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The organization the user is acting for.
    pub organization_id: Uuid,
    /// The user's role in that organization.
    pub role: MemberRole,
    /// IP address of the request origin.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: Uuid,
        organization_id: Uuid,
        role: MemberRole,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            user_id,
            organization_id,
            role,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// Whether the member may manage links created by others.
    pub fn is_admin_or_above(&self) -> bool {
        self.role.has_at_least(&MemberRole::Admin)
    }
}
