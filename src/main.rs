//! stepwise - incremental repository migration for Git remotes
//!
//! CLI binary for pushing history to a new remote in bounded batches.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "stepwise")]
#[command(about = "Migrate a Git repository to a new remote in bounded, resumable batches")]
#[command(version)]
struct Cli {
    /// Path to the local repo (defaults to the current directory)
    #[arg(short, long, default_value = ".")]
    local: PathBuf,

    /// Name of the remote used as the migration destination; must already be
    /// configured in the local repo ('git remote add ...')
    #[arg(short, long, default_value = "codecommit")]
    remote: String,

    /// Commit batch size per push
    #[arg(short, long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    batch_size: u64,

    /// Remove the temporary tags created by migration from both the local
    /// repo and the remote, doing no migration work. Cleanup runs
    /// automatically after a successful migration but not after a failure,
    /// so a re-run can use the prior run's tags to skip batches that already
    /// landed
    #[arg(short, long)]
    clean: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    cli::run_migrate(
        &cli.local,
        &cli.remote,
        usize::try_from(cli.batch_size)?,
        cli.clean,
    )?;

    Ok(())
}
