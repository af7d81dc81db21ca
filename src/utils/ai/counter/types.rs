//! Token counter types and configurations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Model token counting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTokenConfig {
    /// Model family name
    pub model: String,
    /// Average characters per token for Latin-script text
    pub chars_per_token: f64,
    /// Tokens charged per CJK / full-width character
    pub wide_char_tokens: f64,
    /// Overhead tokens per message
    pub message_overhead: u32,
    /// Overhead tokens per request
    pub request_overhead: u32,
}

impl ModelTokenConfig {
    /// Create default model configurations
    pub(super) fn default_configs() -> HashMap<String, ModelTokenConfig> {
        let mut configs = HashMap::new();

        for (model, chars_per_token, wide_char_tokens, message_overhead, request_overhead) in [
            ("gpt-4", 4.0, 1.0, 3, 3),
            ("gpt-3.5-turbo", 4.0, 1.0, 3, 3),
            ("claude", 3.5, 1.2, 4, 5),
            ("gemini", 4.0, 1.0, 3, 3),
            ("deepseek", 3.8, 0.7, 3, 3),
            ("qwen", 3.8, 0.7, 3, 3),
            ("default", 4.0, 1.0, 3, 3),
        ] {
            configs.insert(
                model.to_string(),
                ModelTokenConfig {
                    model: model.to_string(),
                    chars_per_token,
                    wide_char_tokens,
                    message_overhead,
                    request_overhead,
                },
            );
        }

        configs
    }
}
