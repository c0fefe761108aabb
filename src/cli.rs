//! clap-based command line interface.
//!
//! Defines the [`Cli`] struct with subcommands [`Command`] (run, modes)
//! and global flags (--verbose, --quiet). Mode-specific language
//! parameters are validated here, before anything is submitted.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::ScribaError;
use crate::job::Mode;

/// scriba, a document transformation pipeline.
#[derive(Debug, Parser)]
#[command(name = "scriba", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(long, global = true, default_value_t = false)]
    pub quiet: bool,
}

/// Transformation pipeline selector, mapped to [`Mode`] internally.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Extract text from the document, no further transformation.
    Recognize,
    /// Extract text, then proofread it.
    RecognizeProofread,
    /// Proofread the document text.
    Proofread,
    /// Extract text, then translate it.
    RecognizeTranslate,
    /// Translate the document text.
    Translate,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Transform a document and wait for the result.
    Run {
        /// Path to the source document.
        file: PathBuf,

        /// Which transformation pipeline to run.
        #[arg(long, value_enum)]
        mode: ModeArg,

        /// Text language, required for proofreading modes.
        #[arg(long)]
        language: Option<String>,

        /// Source language, required for translation modes.
        #[arg(long)]
        source: Option<String>,

        /// Target language, required for translation modes.
        #[arg(long)]
        target: Option<String>,
    },

    /// List the available transformation modes.
    Modes,
}

/// Build a [`Mode`] from the CLI arguments, rejecting missing
/// mode-specific parameters up front.
pub fn resolve_mode(
    mode: ModeArg,
    language: Option<String>,
    source: Option<String>,
    target: Option<String>,
) -> Result<Mode, ScribaError> {
    let need = |value: Option<String>, flag: &str| {
        value.ok_or_else(|| ScribaError::Input(format!("--{flag} is required for this mode")))
    };
    match mode {
        ModeArg::Recognize => Ok(Mode::RecognizeOnly),
        ModeArg::RecognizeProofread => Ok(Mode::RecognizeAndProofread {
            language: need(language, "language")?,
        }),
        ModeArg::Proofread => Ok(Mode::ProofreadOnly {
            language: need(language, "language")?,
        }),
        ModeArg::RecognizeTranslate => Ok(Mode::RecognizeAndTranslate {
            source: need(source, "source")?,
            target: need(target, "target")?,
        }),
        ModeArg::Translate => Ok(Mode::TranslateOnly {
            source: need(source, "source")?,
            target: need(target, "target")?,
        }),
    }
}
