//! End-to-end dispatch scenarios
//!
//! Every test runs the real splitter, executor and scheduler against a
//! [`ScriptedClient`]. Tests that back off or stagger use a paused clock.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::word_estimator;
    use crate::common::{FailureMode, LineTask, ScriptedClient, WorkItemFactory};
    use crate::{assert_err, assert_ok};
    use adaptive_dispatch::{
        CancellationToken, DispatchConfig, DispatchError, DispatchPhase, Dispatcher,
        ModelLimitTable, ModelLimits, ProviderError, RetrySettings,
    };
    use std::sync::Arc;
    use std::time::Duration;

    const MODEL: &str = "scripted-model";

    fn dispatcher(client: &Arc<ScriptedClient>, limits: ModelLimits, config: DispatchConfig) -> Dispatcher {
        assert_ok!(Dispatcher::new(client.clone(), config))
            .with_estimator(Arc::new(word_estimator))
            .with_limit_resolver(Arc::new(
                ModelLimitTable::new().strict().with_limits(MODEL, limits),
            ))
    }

    fn config() -> DispatchConfig {
        DispatchConfig::new(MODEL)
    }

    fn lines_per_call(client: &ScriptedClient) -> Vec<usize> {
        let mut calls = client.calls();
        calls.sort_by_key(|(options, _)| options.batch_index);
        calls
            .iter()
            .map(|(_, prompts)| prompts.user.lines().count())
            .collect()
    }

    /// 10 items of 1000 tokens, 500 tokens of system prompt, 4500 input budget
    #[tokio::test(start_paused = true)]
    async fn test_ten_items_pack_into_three_batches() {
        let client = Arc::new(ScriptedClient::new());
        let task = LineTask::new(500);
        let dispatcher = dispatcher(&client, ModelLimits::new(7500, 10_000), config());

        let result = assert_ok!(
            dispatcher
                .dispatch(&task, WorkItemFactory::sized(10, 1000))
                .await
        );

        assert_eq!(result.total_batches, 3);
        assert_eq!(result.failed_batches, 0);
        assert_eq!(result.results.len(), 10);
        assert_eq!(lines_per_call(&client), vec![4, 4, 2]);
        // "w w w ..." with 1000 words is 1999 bytes long
        assert_eq!(result.results["item-005"], 1999);
    }

    #[tokio::test]
    async fn test_oversized_item_submitted_alone_and_not_retried() {
        let client = Arc::new(ScriptedClient::failing(FailureMode::Always(
            ProviderError::context_length_exceeded("scripted", 200_000, 250_000),
        )));
        let task = LineTask::new(20);
        let dispatcher = dispatcher(&client, ModelLimits::new(200_000, 8192), config());

        let items = vec![WorkItemFactory::single(0, 100_000)];
        let result = assert_ok!(dispatcher.dispatch(&task, items).await);

        assert_eq!(result.total_batches, 1);
        assert_eq!(result.failed_batches, 1);
        assert!(result.results.is_empty());
        assert_eq!(client.call_count(), 1);
        assert!(result.failures[0].error.is_budget_exceeded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_middle_batch_failure_is_isolated() {
        let client = Arc::new(ScriptedClient::failing(FailureMode::Batches(
            vec![1],
            ProviderError::api_error("scripted", 500, "internal error"),
        )));
        let task = LineTask::new(500);
        let dispatcher = dispatcher(
            &client,
            ModelLimits::new(7500, 10_000),
            config().with_concurrency(3),
        );

        let result = assert_ok!(
            dispatcher
                .dispatch(&task, WorkItemFactory::sized(10, 1000))
                .await
        );

        assert_eq!(result.total_batches, 3);
        assert_eq!(result.failed_batches, 1);
        assert!(!result.is_complete());
        assert!(!result.is_total_failure());

        let mut keys: Vec<&str> = result.results.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "item-000", "item-001", "item-002", "item-003", "item-008", "item-009"
            ]
        );
        assert_eq!(client.attempts_for(0), 1);
        assert_eq!(client.attempts_for(1), 3);
        assert_eq!(client.attempts_for(2), 1);
    }

    #[tokio::test]
    async fn test_empty_input_returns_empty_result() {
        let client = Arc::new(ScriptedClient::new());
        let task = LineTask::new(10);
        let dispatcher = dispatcher(&client, ModelLimits::new(8192, 4096), config());

        let result = assert_ok!(dispatcher.dispatch(&task, Vec::new()).await);

        assert!(result.results.is_empty());
        assert_eq!(result.failed_batches, 0);
        assert_eq!(result.total_batches, 0);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_path_matches_general_path() {
        let items = WorkItemFactory::sized(6, 100);
        let task = LineTask::new(10);

        let single_client = Arc::new(ScriptedClient::new());
        let single = dispatcher(&single_client, ModelLimits::new(100_000, 10_000), config());
        let single_result = assert_ok!(single.dispatch(&task, items.clone()).await);

        // 0.6 * 400 = 240 input tokens: two items per batch
        let multi_client = Arc::new(ScriptedClient::new());
        let multi = dispatcher(&multi_client, ModelLimits::new(400, 10_000), config());
        let multi_result = assert_ok!(multi.dispatch(&task, items).await);

        assert_eq!(single_result.total_batches, 1);
        assert_eq!(multi_result.total_batches, 3);
        assert_eq!(single_result.results, multi_result.results);
    }

    #[tokio::test]
    async fn test_output_budget_limits_batch_size() {
        let client = Arc::new(ScriptedClient::new());
        let task = LineTask::new(10).with_output_per_item(1000);
        // 0.8 * 2500 = 2000 output tokens: two items per batch
        let dispatcher = dispatcher(
            &client,
            ModelLimits::new(100_000, 2500),
            config().with_stagger(Duration::ZERO),
        );

        let result = assert_ok!(dispatcher.dispatch(&task, WorkItemFactory::sized(5, 3)).await);

        assert_eq!(result.total_batches, 3);
        assert_eq!(lines_per_call(&client), vec![2, 2, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_batches_recover() {
        let client = Arc::new(ScriptedClient::failing(FailureMode::FirstAttempts(
            2,
            ProviderError::rate_limit("scripted", Some(1)),
        )));
        let task = LineTask::new(10);
        let dispatcher = dispatcher(&client, ModelLimits::new(100_000, 10_000), config());

        let result = assert_ok!(dispatcher.dispatch(&task, WorkItemFactory::sized(3, 5)).await);

        assert!(result.is_complete());
        assert_eq!(result.results.len(), 3);
        let attempts: Vec<u32> = client.calls().iter().map(|(o, _)| o.attempt).collect();
        assert_eq!(attempts, vec![0, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_bound_follows_config() {
        let client = Arc::new(ScriptedClient::failing(FailureMode::Always(
            ProviderError::network("scripted", "connection refused"),
        )));
        let task = LineTask::new(10);
        let retry = RetrySettings {
            max_retries: 0,
            ..Default::default()
        };
        let dispatcher = dispatcher(
            &client,
            ModelLimits::new(100_000, 10_000),
            config().with_retry(retry),
        );

        let result = assert_ok!(dispatcher.dispatch(&task, WorkItemFactory::sized(2, 5)).await);

        assert!(result.is_total_failure());
        assert_eq!(client.call_count(), 1);
        assert!(matches!(
            result.failures[0].error,
            DispatchError::Provider(ProviderError::Network { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_garbage_completion_is_retried() {
        let client = Arc::new(ScriptedClient::failing(FailureMode::GarbageFirst));
        let task = LineTask::new(500);
        let dispatcher = dispatcher(&client, ModelLimits::new(7500, 10_000), config());

        let result = assert_ok!(
            dispatcher
                .dispatch(&task, WorkItemFactory::sized(10, 1000))
                .await
        );

        assert!(result.is_complete());
        assert_eq!(client.call_count(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_timeout_is_retried_then_fails() {
        let client =
            Arc::new(ScriptedClient::new().with_latency(Duration::from_secs(10)));
        let task = LineTask::new(10);
        let retry = RetrySettings {
            max_retries: 1,
            attempt_timeout_ms: Some(100),
            ..Default::default()
        };
        let dispatcher = dispatcher(
            &client,
            ModelLimits::new(100_000, 10_000),
            config().with_retry(retry),
        );

        let result = assert_ok!(dispatcher.dispatch(&task, WorkItemFactory::sized(1, 5)).await);

        assert_eq!(result.failed_batches, 1);
        assert_eq!(client.call_count(), 2);
        assert!(matches!(result.failures[0].error, DispatchError::Timeout(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_skips_remaining_batches() {
        let client = Arc::new(ScriptedClient::new());
        let task = LineTask::new(500);
        let dispatcher = dispatcher(
            &client,
            ModelLimits::new(7500, 10_000),
            config().with_stagger(Duration::from_secs(5)),
        );

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let result = assert_ok!(
            dispatcher
                .dispatch_with_cancel(&task, WorkItemFactory::sized(10, 1000), cancel)
                .await
        );

        assert_eq!(result.total_batches, 3);
        assert_eq!(result.failed_batches, 2);
        assert_eq!(result.results.len(), 4);
        assert_eq!(client.call_count(), 1);
        assert!(result.failures.iter().all(|f| f.error.is_cancelled()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_brackets_the_dispatch() {
        let client = Arc::new(ScriptedClient::new());
        let task = LineTask::new(500);
        let dispatcher = dispatcher(&client, ModelLimits::new(7500, 10_000), config());

        assert_ok!(
            dispatcher
                .dispatch(&task, WorkItemFactory::sized(10, 1000))
                .await
        );

        let progress = task.progress();
        let first = &progress[0];
        let last = &progress[progress.len() - 1];
        assert_eq!(first.completed, 0);
        assert_eq!(first.phase, DispatchPhase::MultiBatchDispatching);
        assert_eq!(last.completed, 3);
        assert_eq!(last.total, 3);
        assert_eq!(last.failed, 0);
        assert_eq!(last.phase, DispatchPhase::Done);

        let counts: Vec<usize> = progress.iter().map(|p| p.completed).collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_builtin_collaborators() {
        let client = Arc::new(ScriptedClient::new());
        let task = LineTask::new(20);
        let dispatcher = assert_ok!(Dispatcher::new(client.clone(), DispatchConfig::new("gpt-4o")));

        let result = assert_ok!(dispatcher.dispatch(&task, WorkItemFactory::sized(3, 50)).await);

        assert_eq!(result.total_batches, 1);
        let calls = client.calls();
        assert_eq!(calls[0].0.model, "gpt-4o");
        assert_eq!(calls[0].0.max_output_tokens, 16_384);
    }

    #[tokio::test]
    async fn test_unknown_model_in_strict_table_is_error() {
        let client = Arc::new(ScriptedClient::new());
        let task = LineTask::new(20);
        let dispatcher = assert_ok!(Dispatcher::new(client.clone(), config()))
            .with_limit_resolver(Arc::new(ModelLimitTable::new().strict()));

        let err = assert_err!(dispatcher.dispatch(&task, WorkItemFactory::sized(3, 5)).await);

        assert!(matches!(err, DispatchError::ModelLimits(_)));
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let client = Arc::new(ScriptedClient::new());
        let err = assert_err!(Dispatcher::new(client, DispatchConfig::new("")));
        assert!(matches!(err, DispatchError::Config(_)));
    }
}
