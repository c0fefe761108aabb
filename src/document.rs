//! Output artifact assembly.
//!
//! Consumes the ordered transformed chunks and writes exactly one UTF-8
//! text artifact per job, named deterministically from the job id and
//! mode so repeated runs never collide across jobs.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::job::Mode;

/// Failure building or writing the output artifact.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("failed to write artifact {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Deterministic artifact filename: `{job_id}_{mode_suffix}.txt`.
pub fn artifact_name(job_id: Uuid, mode: &Mode) -> String {
    format!("{job_id}_{}.txt", mode.output_suffix())
}

/// Write the ordered chunk texts as one formatted artifact under
/// `output_dir`, returning the path written.
///
/// The artifact carries a small generated header (mode label and
/// timestamp) followed by the chunks joined in index order. An empty
/// text sequence still produces an artifact with an empty body.
pub fn assemble(
    texts: &[String],
    job_id: Uuid,
    mode: &Mode,
    output_dir: &Path,
) -> Result<PathBuf, AssemblyError> {
    let path = output_dir.join(artifact_name(job_id, mode));

    let mut body = String::new();
    body.push_str(&format!(
        "# {} - generated {}\n\n",
        mode.label(),
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    for text in texts {
        body.push_str(text);
    }

    std::fs::create_dir_all(output_dir).map_err(|source| AssemblyError::Write {
        path: path.display().to_string(),
        source,
    })?;
    std::fs::write(&path, body).map_err(|source| AssemblyError::Write {
        path: path.display().to_string(),
        source,
    })?;

    Ok(path)
}
