//! Inference client test utilities
//!
//! [`ScriptedClient`] answers every `id<TAB>text` line with `id<TAB>len(text)`
//! unless its [`FailureMode`] says otherwise, and records each call.

use adaptive_dispatch::{CallOptions, InferenceClient, PromptPair, ProviderError};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// When the scripted client should fail instead of answering
#[derive(Debug, Clone)]
pub enum FailureMode {
    Never,
    /// Every call fails
    Always(ProviderError),
    /// Calls for these batch indices fail
    Batches(Vec<usize>, ProviderError),
    /// The first `n` attempts of every batch fail
    FirstAttempts(u32, ProviderError),
    /// The first attempt of every batch returns unparseable text
    GarbageFirst,
}

pub struct ScriptedClient {
    failure: FailureMode,
    latency: Duration,
    calls: Mutex<Vec<(CallOptions, PromptPair)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            failure: FailureMode::Never,
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(failure: FailureMode) -> Self {
        Self {
            failure,
            ..Self::new()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<(CallOptions, PromptPair)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of calls made for `batch_index`
    pub fn attempts_for(&self, batch_index: usize) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(options, _)| options.batch_index == batch_index)
            .count()
    }

    fn answer(prompts: &PromptPair) -> String {
        prompts
            .user
            .lines()
            .filter_map(|line| line.split_once('\t'))
            .map(|(id, text)| format!("{}\t{}", id, text.len()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceClient for ScriptedClient {
    async fn complete(
        &self,
        prompts: &PromptPair,
        options: &CallOptions,
    ) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((options.clone(), prompts.clone()));

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match &self.failure {
            FailureMode::Never => Ok(Self::answer(prompts)),
            FailureMode::Always(err) => Err(err.clone()),
            FailureMode::Batches(indices, err) if indices.contains(&options.batch_index) => {
                Err(err.clone())
            }
            FailureMode::Batches(..) => Ok(Self::answer(prompts)),
            FailureMode::FirstAttempts(n, err) if options.attempt < *n => Err(err.clone()),
            FailureMode::FirstAttempts(..) => Ok(Self::answer(prompts)),
            FailureMode::GarbageFirst if options.attempt == 0 => {
                Ok("I'm sorry, I cannot help with that.".to_string())
            }
            FailureMode::GarbageFirst => Ok(Self::answer(prompts)),
        }
    }
}
