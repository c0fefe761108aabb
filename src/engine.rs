//! Parallel chunk transformation with bounded concurrency.
//!
//! [`ChunkEngine`] runs a [`Transformer`] over every chunk of a job
//! through a fixed-size worker pool, retrying transient failures with
//! exponential backoff and bounding each attempt with a timeout. Results
//! are reassembled strictly by chunk index, so output order always
//! matches input order no matter how completion interleaves. The
//! job-level contract is all-or-nothing: if any chunk ultimately fails,
//! the whole run fails with an [`AggregateError`] and no partial results
//! are returned.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::chunker::Chunk;
use crate::service::{ServiceError, Transformer};

/// Configuration for retry behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

impl RetryConfig {
    /// Calculate the delay for a given retry attempt using exponential backoff.
    /// delay = base_delay_ms * 2^(attempt - 1)
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        self.base_delay_ms * 2u64.pow(attempt.saturating_sub(1))
    }

    /// Delay before the next attempt after `err`. Exponential backoff,
    /// raised to the server-requested wait when the failure was a rate
    /// limit.
    pub fn delay_for(&self, attempt: u32, err: &ServiceError) -> u64 {
        let backoff = self.delay_for_attempt(attempt);
        match err {
            ServiceError::RateLimited { retry_after_ms } => backoff.max(*retry_after_ms),
            _ => backoff,
        }
    }
}

/// Tuning knobs for a single engine run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Worker pool size: the number of concurrent external calls.
    pub concurrency: usize,
    pub retry: RetryConfig,
    /// Upper bound on one transformation attempt.
    pub chunk_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            retry: RetryConfig::default(),
            chunk_timeout: Duration::from_secs(120),
        }
    }
}

/// Job-level failure raised when any chunk permanently fails.
///
/// Identifies the lowest failing chunk index and its underlying cause;
/// `failed_chunks` counts every chunk that failed in the run.
#[derive(Debug, Error)]
#[error("chunk {chunk_index} failed after {attempts} attempt(s): {source}")]
pub struct AggregateError {
    pub chunk_index: usize,
    pub attempts: u32,
    pub failed_chunks: usize,
    #[source]
    pub source: ServiceError,
}

/// Runs chunk transformations through a bounded worker pool.
pub struct ChunkEngine {
    config: EngineConfig,
}

impl ChunkEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Transform every chunk, invoking `on_progress(completed, total)`
    /// after each chunk settles (success or failure).
    ///
    /// The progress callback runs inside a short serialized critical
    /// section together with the counter increment, so observers see a
    /// strictly increasing completed count with no lost updates. A
    /// cancelled token makes remaining chunks fail fast; zero chunks
    /// succeed immediately with an empty result.
    pub async fn run(
        &self,
        chunks: Vec<Chunk>,
        transformer: Arc<dyn Transformer>,
        on_progress: impl Fn(usize, usize) + Send + Sync,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, AggregateError> {
        let total = chunks.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let completed = Mutex::new(0usize);
        let completed = &completed;
        let on_progress = &on_progress;

        let mut settled: Vec<(usize, u32, Result<String, ServiceError>)> = stream::iter(chunks)
            .map(|chunk| {
                let transformer = transformer.clone();
                async move {
                    let (attempts, result) = self
                        .transform_with_retry(&chunk, transformer.as_ref(), cancel)
                        .await;
                    {
                        // Single serialized point of progress mutation.
                        let mut count = completed.lock();
                        *count += 1;
                        on_progress(*count, total);
                    }
                    (chunk.index, attempts, result)
                }
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        // Reassemble by ordinal index regardless of completion order.
        settled.sort_by_key(|(index, _, _)| *index);

        let mut texts = Vec::with_capacity(total);
        let mut failure: Option<AggregateError> = None;
        let mut failed_chunks = 0usize;
        for (index, attempts, result) in settled {
            match result {
                Ok(text) => texts.push(text),
                Err(source) => {
                    failed_chunks += 1;
                    if failure.is_none() {
                        failure = Some(AggregateError {
                            chunk_index: index,
                            attempts,
                            failed_chunks: 0,
                            source,
                        });
                    }
                }
            }
        }

        match failure {
            Some(mut err) => {
                err.failed_chunks = failed_chunks;
                tracing::error!(
                    chunk = err.chunk_index,
                    failed = failed_chunks,
                    "transform run failed: {}",
                    err.source
                );
                Err(err)
            }
            None => Ok(texts),
        }
    }

    /// One chunk through the retry loop. Returns the number of attempts
    /// made alongside the final outcome.
    async fn transform_with_retry(
        &self,
        chunk: &Chunk,
        transformer: &dyn Transformer,
        cancel: &CancellationToken,
    ) -> (u32, Result<String, ServiceError>) {
        let mut attempt = 0u32;
        loop {
            if cancel.is_cancelled() {
                return (attempt, Err(ServiceError::Cancelled));
            }
            attempt += 1;

            let outcome = tokio::select! {
                _ = cancel.cancelled() => Err(ServiceError::Cancelled),
                result = tokio::time::timeout(
                    self.config.chunk_timeout,
                    transformer.transform(&chunk.text),
                ) => result.unwrap_or(Err(ServiceError::Timeout)),
            };

            match outcome {
                Ok(text) => return (attempt, Ok(text)),
                Err(err) if err.is_transient() && attempt <= self.config.retry.max_retries => {
                    let delay_ms = self.config.retry.delay_for(attempt, &err);
                    tracing::warn!(
                        chunk = chunk.index,
                        attempt,
                        "transient failure: {err}, retrying in {delay_ms}ms"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(err) => return (attempt, Err(err)),
            }
        }
    }
}
