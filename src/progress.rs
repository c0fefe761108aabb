//! Process-wide job progress tracking.
//!
//! [`ProgressStore`] maps job ids to their live progress records. Writes
//! to one job's record are serialized through the map's per-entry lock,
//! while different jobs never contend. Terminal transitions are
//! absorbing: once a job is Complete or Failed, late `update` calls from
//! straggling workers are no-ops.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a job. Transitions are monotonic:
/// Pending -> Running -> {Complete | Failed}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Running,
    Complete,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "Pending"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Complete => write!(f, "Complete"),
            JobStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Externally visible snapshot of a job's completion state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
    pub status: JobStatus,
    /// Output artifact filename, set only on Complete.
    pub output_file: Option<String>,
    /// Human-readable failure cause, set only on Failed.
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Internal mutable record; `terminal_at` drives TTL eviction.
#[derive(Debug, Clone)]
struct JobRecord {
    completed: usize,
    total: usize,
    status: JobStatus,
    output_file: Option<String>,
    error: Option<String>,
    updated_at: DateTime<Utc>,
    terminal_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    fn snapshot(&self) -> ProgressRecord {
        let percentage = match self.status {
            JobStatus::Complete => 100,
            _ if self.total == 0 => 0,
            _ => ((self.completed * 100) / self.total) as u8,
        };
        ProgressRecord {
            completed: self.completed,
            total: self.total,
            percentage,
            status: self.status,
            output_file: self.output_file.clone(),
            error: self.error.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Concurrent store of per-job progress records.
#[derive(Default)]
pub struct ProgressStore {
    jobs: DashMap<Uuid, JobRecord>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job in Pending state with 0/0 progress.
    pub fn initialize(&self, job_id: Uuid) {
        self.jobs.insert(
            job_id,
            JobRecord {
                completed: 0,
                total: 0,
                status: JobStatus::Pending,
                output_file: None,
                error: None,
                updated_at: Utc::now(),
                terminal_at: None,
            },
        );
    }

    /// Mark a job as actively running.
    pub fn mark_running(&self, job_id: Uuid) {
        if let Some(mut record) = self.jobs.get_mut(&job_id)
            && !record.status.is_terminal()
        {
            record.status = JobStatus::Running;
            record.updated_at = Utc::now();
        }
    }

    /// Overwrite the completion counters for a running job.
    ///
    /// No-op for unknown ids and for jobs already in a terminal state, so
    /// a straggling worker racing the terminal transition cannot revive a
    /// finished job.
    pub fn update(&self, job_id: Uuid, completed: usize, total: usize) {
        if let Some(mut record) = self.jobs.get_mut(&job_id)
            && !record.status.is_terminal()
        {
            record.completed = completed;
            record.total = total;
            record.status = JobStatus::Running;
            record.updated_at = Utc::now();
        }
    }

    /// Terminal success transition, recording the output artifact name.
    pub fn mark_complete(&self, job_id: Uuid, output_file: impl Into<String>) {
        if let Some(mut record) = self.jobs.get_mut(&job_id)
            && !record.status.is_terminal()
        {
            record.completed = record.total;
            record.status = JobStatus::Complete;
            record.output_file = Some(output_file.into());
            let now = Utc::now();
            record.updated_at = now;
            record.terminal_at = Some(now);
        }
    }

    /// Terminal failure transition with a human-readable cause.
    pub fn mark_failed(&self, job_id: Uuid, error: impl Into<String>) {
        if let Some(mut record) = self.jobs.get_mut(&job_id)
            && !record.status.is_terminal()
        {
            record.status = JobStatus::Failed;
            record.error = Some(error.into());
            let now = Utc::now();
            record.updated_at = now;
            record.terminal_at = Some(now);
        }
    }

    /// Snapshot a job's progress. `None` for unknown or evicted ids.
    pub fn read(&self, job_id: Uuid) -> Option<ProgressRecord> {
        self.jobs.get(&job_id).map(|record| record.snapshot())
    }

    /// Remove a job's record entirely.
    pub fn evict(&self, job_id: Uuid) -> bool {
        self.jobs.remove(&job_id).is_some()
    }

    /// Drop terminal records older than `ttl`. Returns how many were
    /// evicted. Running jobs are never touched.
    pub fn evict_expired(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now() - ttl;
        // Counted inside the closure; concurrent inserts make a
        // before/after len() diff unreliable.
        let mut evicted = 0;
        self.jobs.retain(|_, record| match record.terminal_at {
            Some(t) if t <= cutoff => {
                evicted += 1;
                false
            }
            _ => true,
        });
        evicted
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
