//! Token counting implementation

use super::types::ModelTokenConfig;
use crate::core::traits::TokenEstimator;
use std::collections::HashMap;

/// Character-ratio token counter
///
/// Cheap and deterministic; good enough to pack batches with headroom, not a
/// substitute for a real tokenizer when exact counts matter.
#[derive(Debug, Clone)]
pub struct TokenCounter {
    /// Model-specific token counting configurations
    model_configs: HashMap<String, ModelTokenConfig>,
    /// Family used by the [`TokenEstimator`] impl
    active: String,
}

impl TokenCounter {
    /// Create a new token counter using the default family
    pub fn new() -> Self {
        Self {
            model_configs: ModelTokenConfig::default_configs(),
            active: "default".to_string(),
        }
    }

    /// Create a counter whose estimates follow the ratios of `model`'s family
    pub fn for_model(model: &str) -> Self {
        let mut counter = Self::new();
        counter.active = counter.extract_model_family(model);
        counter
    }

    /// Estimate tokens for text content
    pub(super) fn estimate_text_tokens(&self, config: &ModelTokenConfig, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }

        let (wide, narrow) = text.chars().fold((0u64, 0u64), |(wide, narrow), c| {
            if is_wide_char(c) {
                (wide + 1, narrow)
            } else {
                (wide, narrow + 1)
            }
        });

        let estimated = narrow as f64 / config.chars_per_token + wide as f64 * config.wide_char_tokens;

        // 10% buffer, rounded up, for special tokens and encoding overhead
        let base = estimated.ceil() as u32;
        base + base.div_ceil(10)
    }

    /// Get model configuration, falling back to the default family
    pub(super) fn get_model_config(&self, model: &str) -> &ModelTokenConfig {
        self.model_configs
            .get(model)
            .or_else(|| self.model_configs.get(&self.extract_model_family(model)))
            .unwrap_or_else(|| self.default_config())
    }

    fn active_config(&self) -> &ModelTokenConfig {
        self.get_model_config(&self.active)
    }

    fn default_config(&self) -> &ModelTokenConfig {
        static FALLBACK: std::sync::OnceLock<ModelTokenConfig> = std::sync::OnceLock::new();
        self.model_configs.get("default").unwrap_or_else(|| {
            FALLBACK.get_or_init(|| ModelTokenConfig {
                model: "default".to_string(),
                chars_per_token: 4.0,
                wide_char_tokens: 1.0,
                message_overhead: 3,
                request_overhead: 3,
            })
        })
    }

    /// Extract model family from model name
    pub(super) fn extract_model_family(&self, model: &str) -> String {
        // Remove provider prefix if present
        let model = match model.rfind('/') {
            Some(pos) => &model[pos + 1..],
            None => model,
        };
        let model = model.to_lowercase();

        if model.starts_with("gpt-4") || model.starts_with("o1") || model.starts_with("o3") {
            "gpt-4".to_string()
        } else if model.starts_with("gpt-3.5") {
            "gpt-3.5-turbo".to_string()
        } else if model.starts_with("claude") {
            "claude".to_string()
        } else if model.starts_with("gemini") {
            "gemini".to_string()
        } else if model.starts_with("deepseek") {
            "deepseek".to_string()
        } else if model.starts_with("qwen") {
            "qwen".to_string()
        } else {
            "default".to_string()
        }
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenEstimator for TokenCounter {
    fn estimate_tokens(&self, text: &str) -> u32 {
        self.estimate_text_tokens(self.active_config(), text)
    }

    /// Request framing plus one message frame each for the system and user
    /// prompts, on top of the system text itself
    fn prompt_overhead(&self, system: &str) -> u32 {
        let config = self.active_config();
        config.request_overhead
            + 2 * config.message_overhead
            + self.estimate_text_tokens(config, system)
    }
}

/// CJK ideographs, kana, hangul and full-width forms
fn is_wide_char(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x11FF
        | 0x2E80..=0x9FFF
        | 0xAC00..=0xD7AF
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFFEF
        | 0x20000..=0x2FA1F)
}
