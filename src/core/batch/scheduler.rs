//! Bounded, staggered concurrent execution

use crate::utils::error::{DispatchError, Result};
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Runs independent units with at most `concurrency` in flight and at least
/// `stagger` between consecutive launches.
#[derive(Debug, Clone)]
pub struct StaggeredScheduler {
    concurrency: usize,
    stagger: Duration,
}

impl StaggeredScheduler {
    /// Create a scheduler; a concurrency of zero is treated as one
    pub fn new(concurrency: usize, stagger: Duration) -> Self {
        Self {
            concurrency: concurrency.max(1),
            stagger,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn stagger(&self) -> Duration {
        self.stagger
    }

    /// Drive every unit to completion and return their outcomes in input order.
    ///
    /// A failing unit never affects its siblings. Units that have not been
    /// launched when `cancel` fires settle as [`DispatchError::Cancelled`]
    /// without being polled.
    pub async fn run<I, Fut, R>(&self, units: I, cancel: &CancellationToken) -> Vec<Result<R>>
    where
        I: IntoIterator<Item = Fut>,
        I::IntoIter: Send,
        Fut: Future<Output = Result<R>> + Send,
        R: Send,
    {
        let last_launch: Mutex<Option<Instant>> = Mutex::new(None);
        let stagger = self.stagger;

        let launches: Vec<_> = units
            .into_iter()
            .enumerate()
            .map(|(index, unit)| launch(index, unit, &last_launch, stagger, cancel).boxed())
            .collect();
        let mut outcomes: Vec<(usize, Result<R>)> = stream::iter(launches)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        // Sort by index to maintain original order
        outcomes.sort_by_key(|(index, _)| *index);
        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }
}

/// Wait for the launch gate, then drive `unit` to completion
async fn launch<Fut, R>(
    index: usize,
    unit: Fut,
    last_launch: &Mutex<Option<Instant>>,
    stagger: Duration,
    cancel: &CancellationToken,
) -> (usize, Result<R>)
where
    Fut: Future<Output = Result<R>>,
{
    {
        let mut last = last_launch.lock().await;
        if let Some(previous) = *last {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep_until(previous + stagger) => {}
            }
        }
        if cancel.is_cancelled() {
            debug!("Unit {} cancelled before launch", index);
            return (index, Err(DispatchError::cancelled("cancelled before launch")));
        }
        *last = Some(Instant::now());
    }

    debug!("Launching unit {}", index);
    (index, unit.await)
}
