//! Token budget derivation

use crate::config::BudgetConfig;
use crate::core::traits::ModelLimits;
use serde::{Deserialize, Serialize};

/// Per-batch token ceilings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBudget {
    /// Ceiling for system prompt plus the items' input cost
    pub input_budget: u32,
    /// Ceiling for the items' summed output cost
    pub output_budget: u32,
    /// Tokens of the system prompt, charged once per batch
    pub system_overhead: u32,
}

impl TokenBudget {
    pub const fn new(input_budget: u32, output_budget: u32) -> Self {
        Self {
            input_budget,
            output_budget,
            system_overhead: 0,
        }
    }

    /// Derive budgets from model limits.
    ///
    /// `input = min(floor(context_window * input_ratio), input_hard_cap)`,
    /// `output = floor(max_output * output_ratio)`.
    pub fn resolve(limits: &ModelLimits, config: &BudgetConfig) -> Self {
        let input = scale(limits.context_window, config.input_ratio).min(config.input_hard_cap);
        let output = scale(limits.max_output, config.output_ratio);
        Self::new(input, output)
    }

    pub fn with_system_overhead(mut self, system_overhead: u32) -> Self {
        self.system_overhead = system_overhead;
        self
    }
}

fn scale(limit: u32, ratio: f64) -> u32 {
    (f64::from(limit) * ratio).floor() as u32
}
