//! Retry mechanism with exponential backoff

use super::types::RetryConfig;
use crate::utils::error::{DispatchError, Result};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Final result of a retried operation together with how many attempts it took
#[derive(Debug)]
pub struct RetryOutcome<R> {
    pub result: Result<R>,
    pub attempts: u32,
}

/// Retry mechanism with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Backoff before the retry that follows zero-based `attempt`: `base_delay * 2^attempt`
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        let delay = self
            .config
            .base_delay
            .checked_mul(factor)
            .unwrap_or(Duration::MAX);
        let delay = match self.config.max_delay {
            Some(max_delay) => delay.min(max_delay),
            None => delay,
        };

        if self.config.jitter {
            let jitter_factor = 0.1;
            let jitter =
                delay.as_millis() as f64 * jitter_factor * (rand::random::<f64>() - 0.5) * 2.0;
            Duration::from_millis((delay.as_millis() as f64 + jitter).max(0.0) as u64)
        } else {
            delay
        }
    }

    /// Execute `f` until it succeeds, fails with a non-retryable error, runs out of
    /// attempts, or `cancel` fires.
    ///
    /// `f` receives the zero-based attempt number.
    pub async fn call<F, Fut, R>(&self, cancel: &CancellationToken, mut f: F) -> RetryOutcome<R>
    where
        F: FnMut(u32) -> Fut,
        Fut: std::future::Future<Output = Result<R>>,
    {
        let max_attempts = self.config.max_attempts();
        let mut attempt = 0u32;

        loop {
            if cancel.is_cancelled() {
                return RetryOutcome {
                    result: Err(DispatchError::cancelled("cancelled before attempt")),
                    attempts: attempt,
                };
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(DispatchError::cancelled("cancelled during attempt")),
                result = self.run_attempt(f(attempt)) => result,
            };
            attempt += 1;

            let error = match result {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Retry succeeded on attempt {}", attempt);
                    }
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt,
                    };
                }
                Err(error) => error,
            };

            if !error.is_retryable() {
                debug!("Attempt {} failed with non-retryable error: {}", attempt, error);
                return RetryOutcome {
                    result: Err(error),
                    attempts: attempt,
                };
            }

            if attempt >= max_attempts {
                error!("Retry failed after {} attempts: {}", attempt, error);
                return RetryOutcome {
                    result: Err(error),
                    attempts: attempt,
                };
            }

            let mut delay = self.backoff_delay(attempt - 1);
            if let Some(secs) = error.retry_after() {
                delay = delay.max(Duration::from_secs(secs));
            }
            debug!(
                "Attempt {} failed: {}, retrying in {:?}",
                attempt, error, delay
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return RetryOutcome {
                        result: Err(DispatchError::cancelled("cancelled during backoff")),
                        attempts: attempt,
                    };
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    async fn run_attempt<Fut, R>(&self, fut: Fut) -> Result<R>
    where
        Fut: std::future::Future<Output = Result<R>>,
    {
        match self.config.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await?,
            None => fut.await,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
