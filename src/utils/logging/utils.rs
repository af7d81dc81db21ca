use super::types::LogLevel;
use crate::utils::error::{DispatchError, Result};
use std::env;
use tracing_subscriber::EnvFilter;

pub struct LoggingUtils;

impl LoggingUtils {
    /// Install a global fmt subscriber.
    ///
    /// `RUST_LOG` wins over `log_level` when set. Fails if a subscriber is
    /// already installed.
    pub fn init_logger(log_level: Option<LogLevel>) -> Result<()> {
        let level = log_level.unwrap_or(LogLevel::Info);

        tracing_subscriber::fmt()
            .with_env_filter(Self::env_filter(level))
            .with_target(false)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .try_init()
            .map_err(|e| DispatchError::internal(format!("Failed to init logger: {}", e)))
    }

    /// Same as [`init_logger`](Self::init_logger) but emits one JSON object per line
    pub fn init_json_logger(log_level: Option<LogLevel>) -> Result<()> {
        let level = log_level.unwrap_or(LogLevel::Info);

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(Self::env_filter(level))
            .with_current_span(true)
            .try_init()
            .map_err(|e| DispatchError::internal(format!("Failed to init logger: {}", e)))
    }

    fn env_filter(level: LogLevel) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
    }

    /// Level named by `DISPATCH_LOG_LEVEL`, `Info` when unset or unrecognised
    pub fn get_log_level_from_env() -> LogLevel {
        Self::log_level_from_lookup(|key| env::var(key).ok())
    }

    pub fn log_level_from_lookup<F>(lookup: F) -> LogLevel
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup("DISPATCH_LOG_LEVEL")
            .and_then(|value| value.parse().ok())
            .unwrap_or(LogLevel::Info)
    }

    pub fn format_duration(duration: std::time::Duration) -> String {
        let total_ms = duration.as_millis();

        if total_ms < 1000 {
            format!("{}ms", total_ms)
        } else if total_ms < 60_000 {
            format!("{:.2}s", total_ms as f64 / 1000.0)
        } else {
            let minutes = total_ms / 60_000;
            let seconds = (total_ms % 60_000) as f64 / 1000.0;
            format!("{}m {:.2}s", minutes, seconds)
        }
    }
}
