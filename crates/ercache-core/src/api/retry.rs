//! Retry policy for GET requests against the results API.
//!
//! The policy is a plain value injected into [`ApiClient`](super::ApiClient)
//! rather than process-wide session state.

use std::time::Duration;

use reqwest::StatusCode;

/// Maximum number of attempts, including the first one.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Backoff base. Retry n (1-based, n >= 2) waits base * 2^(n-1).
const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;

/// Cap on a single backoff sleep.
const DEFAULT_MAX_BACKOFF_SECS: u64 = 120;

/// Gateway-class statuses; the results CDN returns these under load.
const DEFAULT_RETRY_STATUSES: [u16; 3] = [502, 503, 504];

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub max_backoff: Duration,
    pub retry_statuses: Vec<StatusCode>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: Duration::from_millis(DEFAULT_BACKOFF_BASE_MS),
            max_backoff: Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS),
            retry_statuses: DEFAULT_RETRY_STATUSES
                .iter()
                .filter_map(|code| StatusCode::from_u16(*code).ok())
                .collect(),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn with_max_backoff(mut self, max: Duration) -> Self {
        self.max_backoff = max;
        self
    }

    pub fn is_retryable(&self, status: StatusCode) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Sleep before retry number `retry` (1 = the second attempt).
    /// The first retry goes out immediately; later ones back off exponentially.
    pub fn backoff_before(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let multiplier = 2f64.powi(retry as i32 - 1);
        let secs = self.backoff_base.as_secs_f64() * multiplier;
        Duration::from_secs_f64(secs.min(self.max_backoff.as_secs_f64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.backoff_base, Duration::from_secs(1));
        assert!(policy.is_retryable(StatusCode::BAD_GATEWAY));
        assert!(policy.is_retryable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(policy.is_retryable(StatusCode::GATEWAY_TIMEOUT));

        assert!(!policy.is_retryable(StatusCode::OK));
        assert!(!policy.is_retryable(StatusCode::NOT_FOUND));
        assert!(!policy.is_retryable(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!policy.is_retryable(StatusCode::TOO_MANY_REQUESTS));
    }

    #[test]
    fn test_backoff_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_before(1), Duration::ZERO);
        assert_eq!(policy.backoff_before(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_before(3), Duration::from_secs(4));
        assert_eq!(policy.backoff_before(4), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_capped() {
        let policy = RetryPolicy::default().with_max_backoff(Duration::from_secs(5));
        assert_eq!(policy.backoff_before(10), Duration::from_secs(5));
    }

    #[test]
    fn test_max_attempts_floor() {
        let policy = RetryPolicy::new().with_max_attempts(0);
        assert_eq!(policy.max_attempts, 1);
    }
}
