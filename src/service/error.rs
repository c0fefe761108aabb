//! Error types for the external transformation service boundary.
//!
//! [`ServiceError`] covers every way a transform or recognition call can
//! fail. The engine's retry policy only distinguishes transient from
//! permanent failures, so the classification lives here as
//! [`ServiceError::is_transient`].

use thiserror::Error;

/// Errors surfaced by the external transformation service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The server returned HTTP 429. `retry_after_ms` is how long the
    /// server asked us to wait before retrying.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The call did not complete within the configured per-chunk timeout.
    #[error("request timed out")]
    Timeout,

    /// Error returned by the API (e.g. 401 invalid key, 422 bad payload,
    /// 500 internal error). Carries the HTTP status and response body.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Underlying network failure (DNS, connection refused, reset).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be interpreted.
    #[error("failed to parse service response: {0}")]
    Parse(String),

    /// The owning job was cancelled while this call was pending.
    #[error("cancelled")]
    Cancelled,
}

impl ServiceError {
    /// Whether the failure is worth retrying.
    ///
    /// Rate limits, timeouts, network faults and server-side (5xx) errors
    /// are transient. Client-side API errors, parse failures and
    /// cancellation are permanent and fail the chunk immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            ServiceError::RateLimited { .. } => true,
            ServiceError::Timeout => true,
            ServiceError::Network(_) => true,
            ServiceError::ApiError { status, .. } => *status >= 500,
            ServiceError::Parse(_) => false,
            ServiceError::Cancelled => false,
        }
    }
}
