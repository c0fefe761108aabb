use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use scriba::cli::{Cli, Command, resolve_mode};
use scriba::config::ScribaConfig;
use scriba::error::ScribaError;
use scriba::job::Mode;
use scriba::orchestrator::JobOrchestrator;
use scriba::progress::JobStatus;
use scriba::service::{LocalRecognizer, TextServiceClient};
use scriba::ui::JobView;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Run {
            file,
            mode,
            language,
            source,
            target,
        } => {
            let mode = resolve_mode(mode, language, source, target)?;
            run(mode, &file).await
        }
        Command::Modes => {
            print_modes();
            Ok(())
        }
    }
}

async fn run(mode: Mode, file: &Path) -> Result<()> {
    let config = ScribaConfig::load()?;
    let client = if config.service_url.is_empty() {
        TextServiceClient::new(config.api_key.clone())
    } else {
        TextServiceClient::with_base_url(config.api_key.clone(), config.service_url.clone())
    };
    let orchestrator =
        JobOrchestrator::new(Arc::new(client), Arc::new(LocalRecognizer), &config);

    let view = JobView::start(mode.label());
    let job_id = orchestrator.submit(mode, file)?;

    loop {
        let record = orchestrator
            .status(job_id)
            .ok_or_else(|| ScribaError::JobNotFound(job_id.to_string()))?;
        view.update(&record);
        if record.status.is_terminal() {
            view.finish(&record);
            if record.status == JobStatus::Failed {
                bail!(
                    "{}",
                    record.error.unwrap_or_else(|| "unknown error".to_string())
                );
            }
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}

fn print_modes() {
    println!("Available modes:");
    println!("  recognize            Extract text from the document");
    println!("  recognize-proofread  Extract text, then proofread (--language)");
    println!("  proofread            Proofread the document text (--language)");
    println!("  recognize-translate  Extract text, then translate (--source, --target)");
    println!("  translate            Translate the document text (--source, --target)");
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
