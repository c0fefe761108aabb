//! Terminal progress rendering.
//!
//! Uses `indicatif` for the progress bar and `console` for colored
//! output. [`JobView`] tracks a job visually while the caller polls the
//! orchestrator.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::progress::{JobStatus, ProgressRecord};

/// Visual progress indicator for one job.
pub struct JobView {
    bar: ProgressBar,
    green: Style,
    red: Style,
}

impl JobView {
    /// Start a spinner-style bar; it switches to a chunk counter once the
    /// job's total is known.
    pub fn start(label: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        bar.set_message(format!("{label}: submitting"));
        bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            bar,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
        }
    }

    /// Reflect the latest progress snapshot.
    pub fn update(&self, record: &ProgressRecord) {
        if record.total > 0 && self.bar.length() != Some(record.total as u64) {
            self.bar.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:30.cyan/blue} {pos}/{len} chunks {msg}")
                    .expect("invalid template"),
            );
            self.bar.set_length(record.total as u64);
        }
        self.bar.set_position(record.completed as u64);
        self.bar.set_message(record.status.to_string());
    }

    /// Finish the bar and print the terminal outcome.
    pub fn finish(&self, record: &ProgressRecord) {
        self.bar.finish_and_clear();
        match record.status {
            JobStatus::Complete => {
                let artifact = record.output_file.as_deref().unwrap_or("<unknown>");
                println!(
                    "  {} Job complete: {artifact}",
                    self.green.apply_to("✓")
                );
            }
            JobStatus::Failed => {
                let cause = record.error.as_deref().unwrap_or("unknown error");
                println!("  {} Job failed: {cause}", self.red.apply_to("✗"));
            }
            _ => {}
        }
    }
}
