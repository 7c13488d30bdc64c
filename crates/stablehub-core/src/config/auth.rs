//! Authentication and password hashing configuration.

use serde::{Deserialize, Serialize};

/// Session-token validation and share-password hashing settings.
///
/// Session tokens are issued by the external auth service; StableHub only
/// validates them with the shared HMAC secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC-SHA256 secret used to validate member session tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Clock-skew leeway in seconds when validating token expiry.
    #[serde(default = "default_leeway")]
    pub jwt_leeway_seconds: u64,
    /// Argon2id memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub argon2_memory_kib: u32,
    /// Argon2id iteration count.
    #[serde(default = "default_iterations")]
    pub argon2_iterations: u32,
    /// Argon2id parallelism.
    #[serde(default = "default_parallelism")]
    pub argon2_parallelism: u32,
    /// Minimum length of a share-link password.
    #[serde(default = "default_password_min")]
    pub share_password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_leeway_seconds: default_leeway(),
            argon2_memory_kib: default_memory_kib(),
            argon2_iterations: default_iterations(),
            argon2_parallelism: default_parallelism(),
            share_password_min_length: default_password_min(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION_0123456789abcdef".to_string()
}

fn default_leeway() -> u64 {
    5
}

// 19 MiB, t=2, p=1 lands around 100 ms per verification on commodity hardware.
fn default_memory_kib() -> u32 {
    19_456
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

fn default_password_min() -> usize {
    8
}
