//! Configuration loaded from `scriba.toml`.
//!
//! [`ScribaConfig`] holds every tunable parameter. Values missing from
//! the file fall back to sensible defaults. The `SCRIBA_API_KEY`
//! environment variable takes precedence over the file.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration loaded from `scriba.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScribaConfig {
    /// Transformation service API key.
    #[serde(default)]
    pub api_key: String,

    /// Transformation service base URL. Empty means the built-in default.
    #[serde(default)]
    pub service_url: String,

    /// Directory output artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Maximum characters per chunk.
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    /// Concurrent transformation calls per job.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Maximum retries per chunk before failing the job.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay in milliseconds for exponential backoff.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound in seconds for a single chunk transformation attempt.
    #[serde(default = "default_chunk_timeout_secs")]
    pub chunk_timeout_secs: u64,

    /// Cap on the number of jobs running at once.
    #[serde(default = "default_max_running_jobs")]
    pub max_running_jobs: usize,

    /// Seconds after which terminal job records become evictable.
    #[serde(default = "default_job_ttl_secs")]
    pub job_ttl_secs: u64,
}

fn default_output_dir() -> String {
    "outputs".to_string()
}

fn default_max_chunk_chars() -> usize {
    3000
}

fn default_concurrency() -> usize {
    4
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_chunk_timeout_secs() -> u64 {
    120
}

fn default_max_running_jobs() -> usize {
    8
}

fn default_job_ttl_secs() -> u64 {
    3600
}

impl Default for ScribaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            service_url: String::new(),
            output_dir: default_output_dir(),
            max_chunk_chars: default_max_chunk_chars(),
            concurrency: default_concurrency(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            chunk_timeout_secs: default_chunk_timeout_secs(),
            max_running_jobs: default_max_running_jobs(),
            job_ttl_secs: default_job_ttl_secs(),
        }
    }
}

impl ScribaConfig {
    /// Load configuration from `scriba.toml` in the current directory.
    /// Uses defaults if the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("scriba.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<ScribaConfig>(&contents)?
        } else {
            Self::default()
        };

        // Environment variable takes precedence over the file for the API key.
        if let Ok(key) = std::env::var("SCRIBA_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }
}
