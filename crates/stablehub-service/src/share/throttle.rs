//! Failed-password throttling for password-protected share links.

use std::time::Duration;

use moka::future::Cache;
use tracing::warn;

/// Upper bound on tracked counters.
const MAX_TRACKED: u64 = 100_000;

/// Counts failed password attempts per `(token, client ip)` and per token
/// across all clients.
///
/// A counter expires `window` after its last failure. A limit of zero
/// disables that counter.
#[derive(Debug, Clone)]
pub struct PasswordAttemptThrottle {
    failures: Cache<String, u32>,
    max_per_client: u32,
    max_per_link: u32,
}

impl PasswordAttemptThrottle {
    /// Create a throttle allowing `max_per_client` failures per client and
    /// `max_per_link` failures per token within `window`.
    pub fn new(max_per_client: u32, max_per_link: u32, window: Duration) -> Self {
        let failures = Cache::builder()
            .max_capacity(MAX_TRACKED)
            .time_to_live(window)
            .build();
        Self {
            failures,
            max_per_client,
            max_per_link,
        }
    }

    fn client_key(token: &str, ip: Option<&str>) -> String {
        format!("{token}|{}", ip.unwrap_or("-"))
    }

    // `*` never appears in an address, so this cannot collide with a client key.
    fn link_key(token: &str) -> String {
        format!("{token}|*")
    }

    async fn reached(&self, key: &str, limit: u32) -> bool {
        limit > 0
            && self
                .failures
                .get(key)
                .await
                .is_some_and(|count| count >= limit)
    }

    async fn increment(&self, key: String) -> u32 {
        self.failures
            .entry(key)
            .and_upsert_with(|existing| {
                let count = existing.map(|e| e.into_value()).unwrap_or(0);
                std::future::ready(count.saturating_add(1))
            })
            .await
            .into_value()
    }

    /// Whether further attempts from this client must be refused.
    pub async fn is_locked(&self, token: &str, ip: Option<&str>) -> bool {
        self.reached(&Self::link_key(token), self.max_per_link).await
            || self
                .reached(&Self::client_key(token, ip), self.max_per_client)
                .await
    }

    /// Record one failure and return the updated count for this client.
    pub async fn record_failure(&self, token: &str, ip: Option<&str>) -> u32 {
        let link_count = self.increment(Self::link_key(token)).await;
        if self.max_per_link > 0 && link_count == self.max_per_link {
            warn!("Share password attempts locked out for all clients");
        }

        let count = self.increment(Self::client_key(token, ip)).await;
        if self.max_per_client > 0 && count == self.max_per_client {
            warn!(ip = ip.unwrap_or("-"), "Share password attempts locked out");
        }
        count
    }

    /// Forget this client's failures after a successful verification. The
    /// per-link counter only expires with the window.
    pub async fn clear(&self, token: &str, ip: Option<&str>) {
        self.failures
            .invalidate(&Self::client_key(token, ip))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_locks_after_max_failures() {
        let throttle = PasswordAttemptThrottle::new(3, 0, Duration::from_secs(60));
        let token = "t".repeat(64);

        for expected in 1..=3 {
            assert!(!throttle.is_locked(&token, Some("10.0.0.1")).await);
            assert_eq!(throttle.record_failure(&token, Some("10.0.0.1")).await, expected);
        }
        assert!(throttle.is_locked(&token, Some("10.0.0.1")).await);

        // Other clients and other links are unaffected.
        assert!(!throttle.is_locked(&token, Some("10.0.0.2")).await);
        assert!(!throttle.is_locked(&"u".repeat(64), Some("10.0.0.1")).await);
    }

    #[tokio::test]
    async fn test_link_cap_spans_clients() {
        let throttle = PasswordAttemptThrottle::new(3, 5, Duration::from_secs(60));
        let token = "t".repeat(64);

        for n in 0..5 {
            let ip = format!("203.0.113.{n}");
            assert!(!throttle.is_locked(&token, Some(&ip)).await);
            assert_eq!(throttle.record_failure(&token, Some(&ip)).await, 1);
        }

        assert!(throttle.is_locked(&token, Some("198.51.100.1")).await);
        assert!(throttle.is_locked(&token, None).await);
        assert!(!throttle.is_locked(&"u".repeat(64), Some("198.51.100.1")).await);
    }

    #[tokio::test]
    async fn test_clear_resets_client_only() {
        let throttle = PasswordAttemptThrottle::new(1, 2, Duration::from_secs(60));
        throttle.record_failure("tok", None).await;
        assert!(throttle.is_locked("tok", None).await);

        throttle.clear("tok", None).await;
        assert!(!throttle.is_locked("tok", None).await);

        throttle.record_failure("tok", Some("10.0.0.1")).await;
        throttle.clear("tok", Some("10.0.0.1")).await;
        assert!(throttle.is_locked("tok", Some("10.0.0.2")).await);
    }

    #[tokio::test]
    async fn test_zero_disables() {
        let throttle = PasswordAttemptThrottle::new(0, 0, Duration::from_secs(60));
        for _ in 0..10 {
            throttle.record_failure("tok", None).await;
        }
        assert!(!throttle.is_locked("tok", None).await);
    }
}
