//! Retry policy for transient API failures.
//!
//! The policy is an immutable value evaluated by pure functions; the attempt
//! count lives in the caller's loop, never on the request itself.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// Bounded exponential backoff configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Whether the given failure warrants another attempt.
    ///
    /// `attempt` counts retries already performed; once it reaches
    /// `max_retries` the answer is always no. Only transient failures
    /// (no response, 5xx, 429) are ever retried.
    pub fn should_retry(&self, error: &ApiError, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_transient()
    }

    /// Delay before retry `attempt` (1-based): `base * 2^(attempt - 1)`.
    /// No jitter.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_delay_ms * 2u64.pow(attempt.saturating_sub(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error() -> ApiError {
        ApiError::Status {
            status: 503,
            message: "Service Unavailable".into(),
        }
    }

    fn validation_error() -> ApiError {
        ApiError::Status {
            status: 422,
            message: "Validation Error".into(),
        }
    }

    #[test]
    fn exponential_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(4000));
    }

    #[test]
    fn backoff_delays_non_decreasing() {
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay_ms: 250,
        };
        let delays: Vec<_> = (1..=5).map(|n| policy.delay_for_attempt(n)).collect();
        for pair in delays.windows(2) {
            assert!(pair[1] >= pair[0]);
            assert_eq!(pair[1], pair[0] * 2);
        }
    }

    #[test]
    fn retries_capped_at_max() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(&server_error(), 0));
        assert!(policy.should_retry(&server_error(), 2));
        assert!(!policy.should_retry(&server_error(), 3));
    }

    #[test]
    fn validation_errors_never_retried() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry(&validation_error(), 0));
    }

    #[test]
    fn rate_limit_retried() {
        let policy = RetryPolicy::default();
        let err = ApiError::Status {
            status: 429,
            message: "Too Many Requests".into(),
        };
        assert!(policy.should_retry(&err, 0));
    }
}
