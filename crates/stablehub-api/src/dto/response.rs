//! Response DTOs.

use serde::{Deserialize, Serialize};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` when the process answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since the state was built.
    pub uptime_seconds: u64,
}

/// Status of one backing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// `ok`, `unavailable` or `not_configured`.
    pub status: String,
    /// Provider name, where relevant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Readiness response covering the backing services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since the state was built.
    pub uptime_seconds: u64,
    /// Record store status.
    pub database: ComponentHealth,
    /// Blob store status.
    pub storage: ComponentHealth,
}
