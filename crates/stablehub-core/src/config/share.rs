//! Share-link configuration.

use serde::{Deserialize, Serialize};

/// Share-link creation defaults and access-path limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Expiry applied when a link is created without `expires_at`.
    #[serde(default = "default_expiry_days")]
    pub default_expiry_days: i64,
    /// Upper bound for `expires_at` relative to creation.
    #[serde(default = "default_max_expiry_days")]
    pub max_expiry_days: i64,
    /// `max_views` applied to one-time links created without one.
    #[serde(default = "default_one_time_max_views")]
    pub one_time_default_max_views: i32,
    /// Upper bound on how long a view-ledger write may delay a response.
    #[serde(default = "default_ledger_timeout")]
    pub ledger_write_timeout_ms: u64,
    /// Failed password attempts allowed per token and client within the window.
    #[serde(default = "default_max_attempts")]
    pub max_password_attempts: u32,
    /// Failed password attempts allowed per token across all clients within
    /// the window. Zero disables the per-link cap.
    #[serde(default = "default_max_link_attempts")]
    pub max_password_attempts_per_link: u32,
    /// Length of the password-attempt window in seconds.
    #[serde(default = "default_attempt_window")]
    pub password_attempt_window_seconds: u64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            default_expiry_days: default_expiry_days(),
            max_expiry_days: default_max_expiry_days(),
            one_time_default_max_views: default_one_time_max_views(),
            ledger_write_timeout_ms: default_ledger_timeout(),
            max_password_attempts: default_max_attempts(),
            max_password_attempts_per_link: default_max_link_attempts(),
            password_attempt_window_seconds: default_attempt_window(),
        }
    }
}

fn default_expiry_days() -> i64 {
    7
}

fn default_max_expiry_days() -> i64 {
    365
}

fn default_one_time_max_views() -> i32 {
    1
}

fn default_ledger_timeout() -> u64 {
    2_000
}

fn default_max_attempts() -> u32 {
    5
}

fn default_max_link_attempts() -> u32 {
    50
}

fn default_attempt_window() -> u64 {
    900
}
