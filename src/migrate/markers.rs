//! Resumability markers
//!
//! Every finalized batch gets a lightweight tag whose name embeds a strictly
//! increasing sequence number. A later run compares its plan against the
//! marker tags already on the remote to recognize work a prior, possibly
//! interrupted, run completed.

use crate::error::{Error, Result};
use crate::repo::Backend;
use crate::types::{Batch, CommitId, Marker, PushKind};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Name prefix shared by every migration marker tag
pub const MIGRATION_TAG_PREFIX: &str = "stepwise_migration_";

/// What to do about one planned marker given the remote's view of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerDisposition {
    /// Not on the remote yet: create locally and queue for pushing
    Create,
    /// Already on the remote pointing at the same commit: prior run landed it
    Skip,
    /// On the remote pointing elsewhere: inconsistent prior attempt
    Conflict {
        /// Commit the remote recorded under this name
        remote_commit: CommitId,
    },
}

/// Reconcile one planned marker name against the remote marker map
pub fn reconcile(
    name: &str,
    commit: &CommitId,
    remote: &BTreeMap<String, CommitId>,
) -> MarkerDisposition {
    match remote.get(name) {
        None => MarkerDisposition::Create,
        Some(existing) if existing == commit => MarkerDisposition::Skip,
        Some(existing) => MarkerDisposition::Conflict {
            remote_commit: existing.clone(),
        },
    }
}

/// Allocates sequence numbers and manages marker tags for one migration run
pub struct MarkerSet {
    remote: BTreeMap<String, CommitId>,
    next_seq: u64,
    planned: Vec<Marker>,
    skipped: usize,
    commits_batched: usize,
}

impl MarkerSet {
    /// Start a marker set against a snapshot of the remote's marker tags
    pub fn new(remote: BTreeMap<String, CommitId>) -> Self {
        Self {
            remote,
            next_seq: 0,
            planned: Vec::new(),
            skipped: 0,
            commits_batched: 0,
        }
    }

    /// Finalize batches in order: allocate the next sequence number for each,
    /// create the local tag when the remote does not have it yet, skip when
    /// the remote already recorded the same commit, and fail on a mismatch.
    pub fn finalize<B: Backend + ?Sized>(&mut self, backend: &B, batches: &[Batch]) -> Result<()> {
        for batch in batches {
            self.next_seq += 1;
            let name = format!("{MIGRATION_TAG_PREFIX}{}", self.next_seq);

            match reconcile(&name, &batch.head, &self.remote) {
                MarkerDisposition::Create => {
                    backend.create_tag(&name, &batch.head)?;
                    debug!("created marker {name} -> {} ({} commits)", batch.head, batch.commits);
                    self.planned.push(Marker {
                        name,
                        seq: self.next_seq,
                        commit: batch.head.clone(),
                    });
                }
                MarkerDisposition::Skip => {
                    debug!("marker {name} already on remote, skipping");
                    self.skipped += 1;
                }
                MarkerDisposition::Conflict { remote_commit } => {
                    return Err(Error::MarkerConflict {
                        name,
                        local_commit: batch.head.clone(),
                        remote_commit,
                    });
                }
            }
            self.commits_batched += batch.commits;
        }
        Ok(())
    }

    /// Markers created this run, in ascending sequence order
    pub fn planned(&self) -> &[Marker] {
        &self.planned
    }

    /// Markers recognized as already migrated by a prior run
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Highest sequence number allocated so far
    pub const fn last_seq(&self) -> u64 {
        self.next_seq
    }

    /// Total commits covered by batches finalized this run
    pub const fn commits_batched(&self) -> usize {
        self.commits_batched
    }

    /// Check the refreshed remote view against what this run planned.
    /// A mismatch is fatal; a marker missing after its push was confirmed is
    /// only logged, since the next run will push it again.
    pub fn verify(&self, refreshed: &BTreeMap<String, CommitId>) -> Result<()> {
        for marker in &self.planned {
            match refreshed.get(&marker.name) {
                Some(commit) if *commit == marker.commit => {}
                Some(commit) => {
                    return Err(Error::MarkerConflict {
                        name: marker.name.clone(),
                        local_commit: marker.commit.clone(),
                        remote_commit: commit.clone(),
                    });
                }
                None => warn!("marker {} not visible on remote after push", marker.name),
            }
        }
        Ok(())
    }
}

/// Delete all local marker tags, returning how many were removed
pub fn cleanup_local<B: Backend + ?Sized>(backend: &B) -> Result<usize> {
    let tags = backend.local_tags(MIGRATION_TAG_PREFIX)?;
    if !tags.is_empty() {
        backend.delete_tags(&tags)?;
        debug!("deleted {} local marker tags", tags.len());
    }
    Ok(tags.len())
}

/// Delete the remote copies of the given markers with one batched push of
/// delete refspecs
pub fn cleanup_remote<B: Backend + ?Sized>(
    backend: &B,
    remote: &str,
    markers: &BTreeMap<String, CommitId>,
) -> Result<()> {
    if markers.is_empty() {
        return Ok(());
    }
    let names: Vec<String> = markers.keys().cloned().collect();
    backend.push(remote, &PushKind::DeleteTags(names), None)?;
    Ok(())
}
