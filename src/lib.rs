//! Document transformation job engine.
//!
//! Splits a document into bounded chunks, transforms them in parallel
//! against an external text service (proofreading, translation, text
//! recognition), tracks live progress per job, and reassembles the
//! results into a single output artifact.

pub mod chunker;
pub mod cli;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod job;
pub mod orchestrator;
pub mod progress;
pub mod service;
pub mod ui;

pub use chunker::{Chunk, chunk_text};
pub use config::ScribaConfig;
pub use engine::{AggregateError, ChunkEngine, EngineConfig, RetryConfig};
pub use error::ScribaError;
pub use job::Mode;
pub use orchestrator::JobOrchestrator;
pub use progress::{JobStatus, ProgressRecord, ProgressStore};
