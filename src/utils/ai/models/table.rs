//! Overridable limit lookup

use super::utils::ModelUtils;
use crate::core::traits::{ModelLimitResolver, ModelLimits};
use crate::utils::error::{DispatchError, Result};
use std::collections::HashMap;
use tracing::debug;

/// Explicit per-model limits layered over the built-in table
///
/// With `strict` set, ids missing from the overrides are an error instead of
/// falling back to [`ModelUtils`].
#[derive(Debug, Clone, Default)]
pub struct ModelLimitTable {
    overrides: HashMap<String, ModelLimits>,
    strict: bool,
}

impl ModelLimitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject models that have no explicit entry
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn with_limits(mut self, model: impl Into<String>, limits: ModelLimits) -> Self {
        self.overrides.insert(model.into(), limits);
        self
    }

    pub fn insert(&mut self, model: impl Into<String>, limits: ModelLimits) {
        self.overrides.insert(model.into(), limits);
    }
}

impl ModelLimitResolver for ModelLimitTable {
    fn model_limits(&self, model: &str) -> Result<ModelLimits> {
        if let Some(limits) = self.overrides.get(model) {
            return Ok(*limits);
        }
        if self.strict {
            return Err(DispatchError::model_limits(format!(
                "No limits configured for model: {}",
                model
            )));
        }
        debug!("No limit override for {}, using built-in table", model);
        Ok(ModelUtils::get_model_limits(model))
    }
}
