use thiserror::Error;

use crate::document::AssemblyError;
use crate::engine::AggregateError;
use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum ScribaError {
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid submission, rejected synchronously. Never reaches the
    /// background pipeline.
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Transformation service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Transformation failed: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_display() {
        let err = ScribaError::Input("no file uploaded".into());
        assert_eq!(err.to_string(), "Invalid input: no file uploaded");
    }

    #[test]
    fn service_error_converts() {
        let err: ScribaError = ServiceError::Timeout.into();
        assert!(matches!(err, ScribaError::Service(_)));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScribaError>();
    }
}
