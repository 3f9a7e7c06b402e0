//! Migration orchestration
//!
//! Sequences one migration run: discover remote state, plan batches for every
//! branch head, push markers in ascending order, push branches, push the
//! remaining tags, verify the remote's marker state, clean up.

use crate::error::Result;
use crate::migrate::markers::{self, MIGRATION_TAG_PREFIX, MarkerSet};
use crate::migrate::progress::{Phase, ProgressCallback};
use crate::migrate::push::Pusher;
use crate::repo::Backend;
use crate::types::{CommitId, MigrationReport, PushKind};
use crate::walk::AncestryWalker;
use tracing::debug;

/// Settings for one migration run
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Remote to migrate to; must already be configured in the repository
    pub remote: String,
    /// Commit batch size per push
    pub batch_size: usize,
    /// Only remove migration tags locally and remotely, do no migration work
    pub clean: bool,
}

/// Run one migration (or cleanup-only) pass.
///
/// Nothing is mutated before the remote has been contacted successfully, so
/// a misconfigured remote aborts with the repository untouched.
pub fn run_migration<B: Backend + ?Sized>(
    backend: &B,
    options: &MigrationOptions,
    progress: &dyn ProgressCallback,
) -> Result<MigrationReport> {
    progress.on_phase(Phase::Discovering);
    let remote_markers = backend.list_remote_tags(&options.remote, MIGRATION_TAG_PREFIX)?;

    if options.clean {
        markers::cleanup_local(backend)?;
        markers::cleanup_remote(backend, &options.remote, &remote_markers)?;
        progress.on_phase(Phase::Complete);
        return Ok(MigrationReport::default());
    }

    // Stale local markers from an interrupted run would collide with the
    // sequence numbers this run allocates
    progress.on_phase(Phase::CleaningLocal);
    markers::cleanup_local(backend)?;

    progress.on_phase(Phase::Planning);
    let mut marker_set = MarkerSet::new(remote_markers);
    let mut walker = AncestryWalker::new(options.batch_size);

    let branches = backend.branch_heads()?;
    let mut heads: Vec<CommitId> = vec![backend.head_commit()?];
    heads.extend(branches.iter().map(|(_, commit)| commit.clone()));

    // One shared visited set across all heads, so converging history is
    // batched exactly once
    for head in &heads {
        let leftover = walker.walk(backend, head, &mut |batches| {
            marker_set.finalize(backend, batches)
        })?;
        marker_set.finalize(backend, &leftover)?;
    }
    debug!(
        "planned {} markers ({} skipped) over {} commits",
        marker_set.planned().len(),
        marker_set.skipped(),
        marker_set.commits_batched()
    );

    let pusher = Pusher::new(backend, &options.remote);

    // Ascending order means the highest marker on the remote tells a resumed
    // run exactly how much of the sequence already landed
    progress.on_phase(Phase::PushingMarkers);
    progress.on_message(&format!(
        "will attempt to push {} migration tags",
        marker_set.planned().len()
    ));
    for marker in marker_set.planned() {
        progress.on_message(&format!(
            "pushing tag {} ({} of {}), commit {}",
            marker.name,
            marker.seq,
            marker_set.last_seq(),
            marker.commit
        ));
        pusher.push_with_retries(&PushKind::Tag(marker.name.clone()), progress)?;
    }

    progress.on_phase(Phase::PushingBranches);
    let mut branches_pushed = Vec::new();
    for (name, _) in &branches {
        pusher.push_with_retries(&PushKind::Branch(name.clone()), progress)?;
        branches_pushed.push(name.clone());
    }

    progress.on_phase(Phase::PushingTags);
    pusher.push_with_retries(&PushKind::AllTags, progress)?;

    progress.on_phase(Phase::Verifying);
    let refreshed = backend.list_remote_tags(&options.remote, MIGRATION_TAG_PREFIX)?;
    marker_set.verify(&refreshed)?;

    // Markers have served their purpose once the whole history landed
    progress.on_phase(Phase::CleaningUp);
    markers::cleanup_local(backend)?;
    markers::cleanup_remote(backend, &options.remote, &refreshed)?;

    progress.on_phase(Phase::Complete);
    Ok(MigrationReport {
        markers_pushed: marker_set.planned().len(),
        markers_skipped: marker_set.skipped(),
        branches_pushed,
        commits_batched: marker_set.commits_batched(),
    })
}
