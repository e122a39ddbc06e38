use crate::Error;
use std::time::Duration;

/// Bounded retry with linear backoff, applied independently to each endpoint.
///
/// Attempt numbers are 1-based. With the defaults an endpoint gets two attempts with a
/// 350ms pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(350),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Whether attempt `attempt` failing with `err` should be followed by another attempt
    /// against the same endpoint.
    pub fn should_retry(&self, attempt: u32, err: &Error) -> bool {
        attempt < self.max_attempts && err.is_transient()
    }

    /// Pause before the attempt that follows attempt `attempt`: `base_delay * attempt`.
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Whether an endpoint that gave up with `err` should hand over to the fallback.
    pub fn should_fallback(&self, err: &Error) -> bool {
        err.is_transient()
    }
}
