//! Configuration management for the dispatcher
//!
//! This module handles loading and validation of [`DispatchConfig`].

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{DispatchError, Result};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

impl DispatchConfig {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading dispatch configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DispatchError::Config(format!("Failed to read config file: {}", e)))?;

        let config: DispatchConfig = serde_yaml::from_str(&content)
            .map_err(|e| DispatchError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate().map_err(DispatchError::Config)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from `DISPATCH_*` environment variables (and `.env`)
    pub fn from_env() -> Result<Self> {
        info!("Loading dispatch configuration from environment variables");
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup using `DISPATCH_*` names.
    ///
    /// `DISPATCH_MODEL` is required; everything else falls back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model = lookup("DISPATCH_MODEL")
            .ok_or_else(|| DispatchError::config("DISPATCH_MODEL is not set"))?;

        let mut config = Self::new(model);

        if let Some(v) = parse_var(&lookup, "DISPATCH_CONCURRENCY")? {
            config.concurrency = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_STAGGER_MS")? {
            config.stagger_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_INPUT_RATIO")? {
            config.budget.input_ratio = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_INPUT_HARD_CAP")? {
            config.budget.input_hard_cap = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_OUTPUT_RATIO")? {
            config.budget.output_ratio = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_MAX_RETRIES")? {
            config.retry.max_retries = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_BASE_DELAY_MS")? {
            config.retry.base_delay_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_MAX_DELAY_MS")? {
            config.retry.max_delay_ms = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_JITTER")? {
            config.retry.jitter = v;
        }
        if let Some(v) = parse_var(&lookup, "DISPATCH_ATTEMPT_TIMEOUT_MS")? {
            config.retry.attempt_timeout_ms = Some(v);
        }

        config.validate().map_err(DispatchError::Config)?;
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| DispatchError::Config(format!("Invalid value for {}: {}", key, e))),
    }
}
