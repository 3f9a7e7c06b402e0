//! Batched migration engine
//!
//! Handles the workflow of migrating history to a new remote in increments:
//! 1. Planning - roll linear runs and pending ancestors into batches
//! 2. Marking - record each finalized batch as a sequenced migration tag
//! 3. Execution - push markers, branches and tags with bounded retries

mod execute;
mod markers;
mod plan;
mod progress;
mod push;

pub use execute::{MigrationOptions, run_migration};
pub use markers::{
    MIGRATION_TAG_PREFIX, MarkerDisposition, MarkerSet, cleanup_local, cleanup_remote, reconcile,
};
pub use plan::{RollupDecision, plan_rollup};
pub use progress::{NoopProgress, Phase, ProgressCallback, PushStatus};
pub use push::{PUSH_RETRY_LIMIT, Pusher};
