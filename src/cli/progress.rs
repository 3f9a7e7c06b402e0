//! CLI progress callback with styled output and a transfer bar

use crate::cli::style::{Stylize, check, cross};
use anstream::{eprintln, println};
use git_stepwise::migrate::{Phase, ProgressCallback, PushStatus};
use git_stepwise::repo::TransferMonitor;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;

/// Prints migration progress to the terminal and renders an object-transfer
/// bar for the first attempt of each push
pub struct CliProgress {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliProgress {
    /// Create a CLI progress printer
    pub const fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn clear_bar(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCallback for CliProgress {
    fn on_phase(&self, phase: Phase) {
        self.clear_bar();
        match phase {
            Phase::Complete => println!("{}", phase.to_string().emphasis()),
            _ => println!("{}...", phase.to_string().emphasis()),
        }
    }

    fn on_push(&self, what: &str, status: &PushStatus) {
        match status {
            PushStatus::Started => println!("  Pushing {}...", what.accent()),
            PushStatus::Success => {
                self.clear_bar();
                println!("  {} Pushed {}", check(), what.accent());
            }
            PushStatus::Retrying(msg) => {
                self.clear_bar();
                eprintln!(
                    "  {} {}",
                    "retrying".muted().for_stderr(),
                    msg.muted().for_stderr()
                );
            }
            PushStatus::Failed(msg) => {
                self.clear_bar();
                eprintln!("  {} Failed to push {}: {}", cross(), what.accent(), msg.error());
            }
        }
    }

    fn on_message(&self, message: &str) {
        println!("  {}", message.muted());
    }

    fn transfer_monitor(&self) -> Option<&dyn TransferMonitor> {
        Some(self)
    }
}

impl TransferMonitor for CliProgress {
    fn on_transfer(&self, current: usize, total: usize, _bytes: usize) {
        if total == 0 {
            return;
        }
        let mut bar = self.bar.borrow_mut();
        let bar = bar.get_or_insert_with(|| {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::with_template("    objects: {pos}/{len} {bar:30}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        });
        bar.set_length(total as u64);
        bar.set_position(current as u64);
    }
}
