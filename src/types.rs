//! Core types for git-stepwise

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque commit identifier (hex object id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommitId(String);

impl CommitId {
    /// Wrap a hex object id
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// The hex form of the id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommitId {
    fn from(hex: &str) -> Self {
        Self(hex.to_string())
    }
}

/// A contiguous run of history staged for one push: the newest commit of the
/// run plus how many previously-unpushed commits a push of it would transfer.
///
/// A batch is *pending* while it may still be rolled into a larger batch and
/// *finalized* once a migration marker has been created for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Newest commit of the run; pushing it transfers the whole run
    pub head: CommitId,
    /// Number of commits the run covers, including `head`
    pub commits: usize,
}

impl Batch {
    /// Convenience constructor
    pub fn new(head: impl Into<CommitId>, commits: usize) -> Self {
        Self {
            head: head.into(),
            commits,
        }
    }
}

/// A named, immutable pointer to one commit recording migration progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// Tag name (`stepwise_migration_<seq>`)
    pub name: String,
    /// Sequence number embedded in the name, starting at 1
    pub seq: u64,
    /// Commit the marker points at
    pub commit: CommitId,
}

/// Per-ref result of a push, as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefUpdate {
    /// Fully-qualified ref name on the remote
    pub refname: String,
    /// What happened to the ref
    pub status: RefStatus,
}

/// Outcome for a single pushed ref
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefStatus {
    /// Remote already had this value
    UpToDate,
    /// A new tag was created on the remote
    NewTag,
    /// A branch head was created or advanced on the remote
    NewHead,
    /// The remote rejected the update; the whole push is treated as failed
    Rejected(String),
}

/// The families of refspecs the push executor can ask the backend to push
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushKind {
    /// A single branch by short name
    Branch(String),
    /// A single tag by name
    Tag(String),
    /// Every local tag
    AllTags,
    /// Delete the named tags on the remote
    DeleteTags(Vec<String>),
}

impl fmt::Display for PushKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch(name) => write!(f, "branch {name}"),
            Self::Tag(name) => write!(f, "tag {name}"),
            Self::AllTags => f.write_str("all tags"),
            Self::DeleteTags(names) => write!(f, "deletion of {} remote tags", names.len()),
        }
    }
}

/// Summary of a completed migration run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Markers created and pushed during this run
    pub markers_pushed: usize,
    /// Markers found already present and matching on the remote
    pub markers_skipped: usize,
    /// Branches pushed (includes up-to-date branches)
    pub branches_pushed: Vec<String>,
    /// Total commits covered by finalized batches this run
    pub commits_batched: usize,
}
