//! Version-control backend abstraction
//!
//! The migration engine only needs a small capability set from the backend:
//! ancestry queries, tag creation/deletion, and push-by-reference. Keeping it
//! behind a trait lets the engine run against the real git repository or an
//! in-memory test double.

mod git;

pub use git::GitBackend;

use crate::error::Result;
use crate::types::{CommitId, PushKind, RefUpdate};
use std::collections::BTreeMap;

/// Receives object-transfer counts while a push is in flight
///
/// Implemented by the CLI to render a progress bar; the backend stays
/// ignorant of how the numbers are displayed.
pub trait TransferMonitor {
    /// Called repeatedly during a push with the current object counts
    fn on_transfer(&self, current: usize, total: usize, bytes: usize);
}

/// Capability set the migration engine consumes from the version-control
/// backend
pub trait Backend {
    /// Commit the default branch (HEAD) points at
    fn head_commit(&self) -> Result<CommitId>;

    /// Every local branch with the commit its head points at
    fn branch_heads(&self) -> Result<Vec<(String, CommitId)>>;

    /// Parent commits of `commit`, in order; empty for a root commit
    fn parents(&self, commit: &CommitId) -> Result<Vec<CommitId>>;

    /// Tags on the remote whose name starts with `prefix`, mapped to the
    /// commit they point at
    fn list_remote_tags(&self, remote: &str, prefix: &str)
    -> Result<BTreeMap<String, CommitId>>;

    /// Local tag names matching `prefix`
    fn local_tags(&self, prefix: &str) -> Result<Vec<String>>;

    /// Create a lightweight tag pointing at `target`
    fn create_tag(&self, name: &str, target: &CommitId) -> Result<()>;

    /// Delete the named local tags
    fn delete_tags(&self, names: &[String]) -> Result<()>;

    /// Push the given refspec family to `remote`, reporting one record per
    /// affected ref. A backend-level `Err` means the push did not complete
    /// (network or protocol failure) and may be retried.
    fn push(
        &self,
        remote: &str,
        kind: &PushKind,
        monitor: Option<&dyn TransferMonitor>,
    ) -> Result<Vec<RefUpdate>>;
}
