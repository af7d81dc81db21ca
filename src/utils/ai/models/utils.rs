use crate::core::traits::{ModelLimitResolver, ModelLimits};
use crate::utils::error::Result;

/// Built-in model limit table
pub struct ModelUtils;

impl ModelUtils {
    /// Limits applied to ids no rule recognises
    pub const DEFAULT_LIMITS: ModelLimits = ModelLimits::new(32_768, 4_096);

    pub fn get_model_limits(model: &str) -> ModelLimits {
        let model_lower = Self::strip_provider_prefix(model).to_lowercase();

        if model_lower.starts_with("gpt-4.1") {
            ModelLimits::new(1_047_576, 32_768)
        } else if model_lower.starts_with("gpt-4o") {
            ModelLimits::new(128_000, 16_384)
        } else if model_lower.starts_with("gpt-4") {
            if model_lower.contains("turbo") {
                ModelLimits::new(128_000, 4_096)
            } else if model_lower.contains("32k") {
                ModelLimits::new(32_768, 4_096)
            } else {
                ModelLimits::new(8_192, 4_096)
            }
        } else if model_lower.starts_with("o1") || model_lower.starts_with("o3") {
            ModelLimits::new(200_000, 100_000)
        } else if model_lower.starts_with("gpt-3.5") {
            ModelLimits::new(16_385, 4_096)
        } else if model_lower.starts_with("claude") {
            if model_lower.contains("3-7") || model_lower.contains("-4") {
                ModelLimits::new(200_000, 64_000)
            } else if model_lower.contains("3-5") {
                ModelLimits::new(200_000, 8_192)
            } else {
                ModelLimits::new(200_000, 4_096)
            }
        } else if model_lower.starts_with("gemini") {
            if model_lower.starts_with("gemini-2.5") {
                ModelLimits::new(1_048_576, 65_536)
            } else {
                ModelLimits::new(1_048_576, 8_192)
            }
        } else if model_lower.starts_with("deepseek") {
            ModelLimits::new(64_000, 8_192)
        } else if model_lower.starts_with("qwen") {
            ModelLimits::new(131_072, 8_192)
        } else {
            Self::DEFAULT_LIMITS
        }
    }

    fn strip_provider_prefix(model: &str) -> &str {
        match model.rfind('/') {
            Some(pos) => &model[pos + 1..],
            None => model,
        }
    }
}

impl ModelLimitResolver for ModelUtils {
    fn model_limits(&self, model: &str) -> Result<ModelLimits> {
        Ok(Self::get_model_limits(model))
    }
}
