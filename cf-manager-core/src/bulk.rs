//! Bulk operation runner
//!
//! Drives many independent single-item upstream calls and records one
//! outcome per item. A failing item never stops the batch.

use std::fmt::Display;
use std::future::Future;

use futures::stream::{self, StreamExt};

use crate::types::{BulkOutcome, ItemResult};

/// 默认并发度：严格串行
const DEFAULT_CONCURRENCY: usize = 1;

/// Executes a batch of sub-operations with per-item accounting.
///
/// Items run in submission order, one at a time by default. With a higher
/// concurrency up to `n` items are in flight at once, but results are still
/// reported in submission order. There is no shared cancellation: every item
/// runs to completion whatever happened to the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkRunner {
    concurrency: usize,
}

impl Default for BulkRunner {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl BulkRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置并发度（最小为 1）
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs `operation` for every item.
    ///
    /// `identify` names each item in the outcome (record name, KV key...).
    /// Errors are captured as `failed` entries carrying the error's display
    /// text.
    pub async fn run<I, T, E, F, Fut, Id>(
        &self,
        items: I,
        identify: Id,
        operation: F,
    ) -> BulkOutcome
    where
        I: IntoIterator,
        Id: Fn(&I::Item) -> String,
        F: Fn(I::Item) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let results: Vec<ItemResult> = stream::iter(items.into_iter().map(|item| {
            let identifier = identify(&item);
            let pending = operation(item);
            async move {
                match pending.await {
                    Ok(_) => ItemResult::success(identifier),
                    Err(e) => {
                        log::warn!("Bulk item '{identifier}' failed: {e}");
                        ItemResult::failed(identifier, e.to_string())
                    }
                }
            }
        }))
        .buffered(self.concurrency)
        .collect()
        .await;

        let outcome = BulkOutcome::from_results(results);
        log::info!(
            "Bulk run finished: {} total, {} succeeded, {} failed",
            outcome.total,
            outcome.succeeded,
            outcome.failed
        );
        outcome
    }
}
