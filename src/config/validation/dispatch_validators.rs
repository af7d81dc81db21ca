//! Dispatcher configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for DispatchConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating dispatch configuration");

        if self.model.trim().is_empty() {
            return Err("Model must not be empty".to_string());
        }

        if self.concurrency == 0 {
            return Err("Concurrency must be greater than 0".to_string());
        }

        self.budget.validate()?;
        self.retry.validate()?;

        Ok(())
    }
}

impl Validate for BudgetConfig {
    fn validate(&self) -> Result<(), String> {
        if !(self.input_ratio > 0.0 && self.input_ratio <= 1.0) {
            return Err(format!(
                "Input ratio must be in (0, 1], got {}",
                self.input_ratio
            ));
        }

        if !(self.output_ratio > 0.0 && self.output_ratio <= 1.0) {
            return Err(format!(
                "Output ratio must be in (0, 1], got {}",
                self.output_ratio
            ));
        }

        if self.input_hard_cap == 0 {
            return Err("Input hard cap must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for RetrySettings {
    fn validate(&self) -> Result<(), String> {
        if let Some(max_delay_ms) = self.max_delay_ms {
            if max_delay_ms < self.base_delay_ms {
                return Err(format!(
                    "Max delay ({}ms) must not be less than base delay ({}ms)",
                    max_delay_ms, self.base_delay_ms
                ));
            }
        }

        if self.attempt_timeout_ms == Some(0) {
            return Err("Attempt timeout must be greater than 0 when set".to_string());
        }

        Ok(())
    }
}
