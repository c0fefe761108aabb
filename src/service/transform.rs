//! Capability contracts for the external transformation collaborators.
//!
//! The engine and orchestrator depend only on these traits, never on a
//! concrete backend. [`Transformer`] is the per-chunk contract the
//! parallel engine consumes; [`TransformService`] is the mode-agnostic
//! client surface; [`Recognizer`] extracts text from an uploaded
//! document before chunking.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use super::error::ServiceError;

/// A single text-in, text-out transformation applied to one chunk.
///
/// Implementations carry their own parameters (language, direction), so
/// the engine only ever sees `transform(text)`.
#[async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(&self, text: &str) -> Result<String, ServiceError>;
}

/// The transformation service client surface, one method per operation.
#[async_trait]
pub trait TransformService: Send + Sync {
    /// Correct spelling, grammar and punctuation in `text`.
    async fn proofread(&self, text: &str, language: &str) -> Result<String, ServiceError>;

    /// Translate `text` from `source` to `target`.
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ServiceError>;
}

/// Extracts text from a source document before chunking.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, input: &Path) -> Result<String, ServiceError>;
}

/// [`Transformer`] that proofreads every chunk in a fixed language.
pub struct ProofreadStage {
    service: Arc<dyn TransformService>,
    language: String,
}

impl ProofreadStage {
    pub fn new(service: Arc<dyn TransformService>, language: impl Into<String>) -> Self {
        Self {
            service,
            language: language.into(),
        }
    }
}

#[async_trait]
impl Transformer for ProofreadStage {
    async fn transform(&self, text: &str) -> Result<String, ServiceError> {
        self.service.proofread(text, &self.language).await
    }
}

/// [`Transformer`] that translates every chunk between a fixed language pair.
pub struct TranslateStage {
    service: Arc<dyn TransformService>,
    source: String,
    target: String,
}

impl TranslateStage {
    pub fn new(
        service: Arc<dyn TransformService>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            service,
            source: source.into(),
            target: target.into(),
        }
    }
}

#[async_trait]
impl Transformer for TranslateStage {
    async fn transform(&self, text: &str) -> Result<String, ServiceError> {
        self.service.translate(text, &self.source, &self.target).await
    }
}

/// [`Recognizer`] that reads the input file directly as UTF-8 text.
///
/// Stands in for a vision backend when none is configured. A real OCR
/// client implements the same trait against its own API.
pub struct LocalRecognizer;

#[async_trait]
impl Recognizer for LocalRecognizer {
    async fn recognize(&self, input: &Path) -> Result<String, ServiceError> {
        tokio::fs::read_to_string(input)
            .await
            .map_err(|e| ServiceError::Parse(format!("cannot read {}: {e}", input.display())))
    }
}
