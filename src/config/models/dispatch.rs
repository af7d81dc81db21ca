//! Dispatcher configuration

use super::*;
use crate::utils::error::RetryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level dispatcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Target model id
    pub model: String,
    /// Maximum batches in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Delay between launching consecutive batches
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,
    /// Token budget derivation
    #[serde(default)]
    pub budget: BudgetConfig,
    /// Per-batch retry policy
    #[serde(default)]
    pub retry: RetrySettings,
}

impl DispatchConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            concurrency: default_concurrency(),
            stagger_ms: default_stagger_ms(),
            budget: BudgetConfig::default(),
            retry: RetrySettings::default(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger_ms = stagger.as_millis() as u64;
        self
    }

    pub fn with_budget(mut self, budget: BudgetConfig) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }
}

/// How input/output budgets are derived from model limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Share of the context window usable for input
    #[serde(default = "default_input_ratio")]
    pub input_ratio: f64,
    /// Absolute input ceiling, applied even to very large context windows
    #[serde(default = "default_input_hard_cap")]
    pub input_hard_cap: u32,
    /// Share of the completion limit usable for output
    #[serde(default = "default_output_ratio")]
    pub output_ratio: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            input_ratio: default_input_ratio(),
            input_hard_cap: default_input_hard_cap(),
            output_ratio: default_output_ratio(),
        }
    }
}

/// Serializable retry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Retries after the initial attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff before the first retry, doubled for each subsequent one
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Backoff ceiling; unbounded when absent
    #[serde(default)]
    pub max_delay_ms: Option<u64>,
    /// Randomize delays by ±10%
    #[serde(default)]
    pub jitter: bool,
    /// Deadline for a single inference call
    #[serde(default)]
    pub attempt_timeout_ms: Option<u64>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: None,
            jitter: false,
            attempt_timeout_ms: None,
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: settings.max_delay_ms.map(Duration::from_millis),
            jitter: settings.jitter,
            attempt_timeout: settings.attempt_timeout_ms.map(Duration::from_millis),
        }
    }
}
