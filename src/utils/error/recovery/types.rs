//! Types and configurations for error recovery patterns

use std::time::Duration;

/// Retry configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the initial attempt; total attempts are `1 + max_retries`
    pub max_retries: u32,
    /// Delay before the first retry; doubles on every subsequent one
    pub base_delay: Duration,
    /// Ceiling on the computed backoff
    pub max_delay: Option<Duration>,
    /// Whether to add ±10% jitter to delays
    pub jitter: bool,
    /// Per-attempt deadline
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(3000),
            max_delay: None,
            jitter: false,
            attempt_timeout: None,
        }
    }
}

impl RetryConfig {
    /// Total number of attempts, including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}
