//! Migrate command - run the batched migration (or cleanup-only pass)

use crate::cli::progress::CliProgress;
use crate::cli::style::{Stylize, check};
use anstream::println;
use git_stepwise::error::Result;
use git_stepwise::migrate::{MigrationOptions, run_migration};
use git_stepwise::repo::GitBackend;
use std::path::Path;

/// Run the migration against the repository at `path`
pub fn run_migrate(path: &Path, remote: &str, batch_size: usize, clean: bool) -> Result<()> {
    let backend = GitBackend::open(path)?;
    let options = MigrationOptions {
        remote: remote.to_string(),
        batch_size,
        clean,
    };

    let progress = CliProgress::new();
    let report = run_migration(&backend, &options, &progress)?;

    println!();
    if clean {
        println!("{} Migration tags removed", check());
        return Ok(());
    }

    println!(
        "{} Migration to {} was successful",
        check(),
        remote.accent()
    );
    println!(
        "  {} commits in {} batches ({} already migrated), {} branches",
        report.commits_batched.accent(),
        (report.markers_pushed + report.markers_skipped).accent(),
        report.markers_skipped.accent(),
        report.branches_pushed.len().accent()
    );

    Ok(())
}
