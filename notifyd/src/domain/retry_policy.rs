//! Retry policy value object.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed-interval retry policy applied to every dispatch.
///
/// A dispatch makes at most `max_retries + 1` attempts, waiting `delay`
/// between consecutive attempts. The delay is constant, not exponential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay between attempts in seconds.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    5
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay_secs: u64) -> Self {
        Self {
            max_retries,
            retry_delay_secs,
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self::new(0, 0)
    }

    /// Total attempts a dispatch may make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait between two attempts.
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    /// Total time spent waiting if every attempt fails.
    pub fn max_total_delay(&self) -> Duration {
        self.delay().saturating_mul(self.max_retries)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}
