//! Job lifecycle ownership.
//!
//! [`JobOrchestrator`] accepts transformation requests, allocates job
//! ids, runs the background pipeline (recognition, chunking, parallel
//! transformation, assembly) and exposes status reads. Submission
//! returns immediately; callers observe completion only by polling.
//! Every pipeline error is caught at the task boundary and converted to
//! a terminal Failed record, so background work never takes down the
//! host.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::chunker::chunk_text;
use crate::config::ScribaConfig;
use crate::document;
use crate::engine::{ChunkEngine, EngineConfig, RetryConfig};
use crate::error::ScribaError;
use crate::job::Mode;
use crate::progress::{ProgressRecord, ProgressStore};
use crate::service::{
    ProofreadStage, Recognizer, ServiceError, TranslateStage, TransformService, Transformer,
};

/// Drives jobs from submission to a terminal state.
#[derive(Clone)]
pub struct JobOrchestrator {
    store: Arc<ProgressStore>,
    service: Arc<dyn TransformService>,
    recognizer: Arc<dyn Recognizer>,
    engine: Arc<ChunkEngine>,
    output_dir: PathBuf,
    max_chunk_chars: usize,
    job_ttl_secs: u64,
    /// Caps the number of jobs running at once; later submissions queue
    /// in Pending until a slot frees up.
    running: Arc<Semaphore>,
    cancellations: Arc<DashMap<Uuid, CancellationToken>>,
}

impl JobOrchestrator {
    pub fn new(
        service: Arc<dyn TransformService>,
        recognizer: Arc<dyn Recognizer>,
        config: &ScribaConfig,
    ) -> Self {
        let engine = ChunkEngine::new(EngineConfig {
            concurrency: config.concurrency,
            retry: RetryConfig {
                max_retries: config.max_retries,
                base_delay_ms: config.base_delay_ms,
            },
            chunk_timeout: Duration::from_secs(config.chunk_timeout_secs),
        });
        Self {
            store: Arc::new(ProgressStore::new()),
            service,
            recognizer,
            engine: Arc::new(engine),
            output_dir: PathBuf::from(&config.output_dir),
            max_chunk_chars: config.max_chunk_chars,
            job_ttl_secs: config.job_ttl_secs,
            running: Arc::new(Semaphore::new(config.max_running_jobs.max(1))),
            cancellations: Arc::new(DashMap::new()),
        }
    }

    /// Submit a transformation request. Validates the input
    /// synchronously, schedules the pipeline in the background and
    /// returns the allocated job id without waiting for any of the work.
    pub fn submit(&self, mode: Mode, input: &Path) -> Result<Uuid, ScribaError> {
        // Opportunistic sweep of expired terminal records.
        let evicted = self
            .store
            .evict_expired(chrono::Duration::seconds(self.job_ttl_secs as i64));
        if evicted > 0 {
            tracing::debug!(evicted, "evicted expired job records");
        }

        if !input.is_file() {
            return Err(ScribaError::Input(format!(
                "input file not found: {}",
                input.display()
            )));
        }

        let job_id = Uuid::new_v4();
        self.store.initialize(job_id);

        let cancel = CancellationToken::new();
        self.cancellations.insert(job_id, cancel.clone());

        tracing::info!(%job_id, mode = %mode, "job submitted");

        let orchestrator = self.clone();
        let input = input.to_path_buf();
        tokio::spawn(async move {
            let outcome = orchestrator.execute(job_id, &mode, &input, cancel).await;
            orchestrator.cancellations.remove(&job_id);
            match outcome {
                Ok(artifact) => {
                    tracing::info!(%job_id, %artifact, "job complete");
                    orchestrator.store.mark_complete(job_id, artifact);
                }
                Err(err) => {
                    tracing::error!(%job_id, "job failed: {err}");
                    orchestrator.store.mark_failed(job_id, err.to_string());
                }
            }
        });

        Ok(job_id)
    }

    /// Snapshot a job's progress. Pure read; `None` for unknown or
    /// evicted ids.
    pub fn status(&self, job_id: Uuid) -> Option<ProgressRecord> {
        self.store.read(job_id)
    }

    /// Resolve a generated artifact filename to its on-disk path, or
    /// `None` when no such artifact exists.
    pub fn artifact(&self, filename: &str) -> Option<PathBuf> {
        let path = self.output_dir.join(filename);
        path.is_file().then_some(path)
    }

    /// Abandon a job. Remaining chunk work fails fast and the job
    /// terminates as Failed. Returns false when the job is not running.
    pub fn cancel(&self, job_id: Uuid) -> bool {
        match self.cancellations.get(&job_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// The full background pipeline for one job. Any error propagates to
    /// the spawn boundary where it becomes a Failed record.
    async fn execute(
        &self,
        job_id: Uuid,
        mode: &Mode,
        input: &Path,
        cancel: CancellationToken,
    ) -> Result<String, ScribaError> {
        // A job cancelled while queued for a slot terminates without
        // ever starting its pipeline.
        let _permit = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(ScribaError::Service(ServiceError::Cancelled));
            }
            permit = self.running.acquire() => {
                permit.map_err(|_| ScribaError::Config("job pool closed".into()))?
            }
        };
        self.store.mark_running(job_id);

        let text = if mode.requires_recognition() {
            self.recognizer.recognize(input).await?
        } else {
            tokio::fs::read_to_string(input).await?
        };
        // Recognition-only pipelines never reach the engine's
        // cancellation checks, so cover the gap here.
        if cancel.is_cancelled() {
            return Err(ScribaError::Service(ServiceError::Cancelled));
        }

        let texts = match self.stage_for(mode) {
            // Recognition-only: the extracted text is the result.
            None => {
                self.store.update(job_id, 1, 1);
                vec![text]
            }
            Some(transformer) => {
                let chunks = chunk_text(&text, self.max_chunk_chars);
                tracing::debug!(%job_id, chunks = chunks.len(), "chunked input");
                let store = self.store.clone();
                self.engine
                    .run(
                        chunks,
                        transformer,
                        move |completed, total| store.update(job_id, completed, total),
                        &cancel,
                    )
                    .await?
            }
        };

        let path = document::assemble(&texts, job_id, mode, &self.output_dir)?;
        let artifact = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());
        Ok(artifact)
    }

    /// Per-chunk transformer for the given mode, `None` when the mode
    /// has no chunked transformation phase.
    fn stage_for(&self, mode: &Mode) -> Option<Arc<dyn Transformer>> {
        match mode {
            Mode::RecognizeOnly => None,
            Mode::RecognizeAndProofread { language } | Mode::ProofreadOnly { language } => Some(
                Arc::new(ProofreadStage::new(self.service.clone(), language.clone())),
            ),
            Mode::RecognizeAndTranslate { source, target }
            | Mode::TranslateOnly { source, target } => Some(Arc::new(TranslateStage::new(
                self.service.clone(),
                source.clone(),
                target.clone(),
            ))),
        }
    }
}
