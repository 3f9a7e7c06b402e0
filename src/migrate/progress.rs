//! Progress callback trait for interface-agnostic updates
//!
//! Lets different interfaces (plain CLI, styled CLI, tests) receive progress
//! updates while a migration runs, without the engine knowing how they are
//! rendered.

use crate::repo::TransferMonitor;
use std::fmt;

/// Migration phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Reading the remote's marker tags
    Discovering,
    /// Removing stale local markers from a prior run
    CleaningLocal,
    /// Walking ancestry and planning batches
    Planning,
    /// Pushing markers in ascending sequence order
    PushingMarkers,
    /// Pushing branch heads
    PushingBranches,
    /// Pushing remaining tags
    PushingTags,
    /// Checking the remote's marker state against the plan
    Verifying,
    /// Removing markers locally and remotely
    CleaningUp,
    /// Migration complete
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Discovering => "Contacting remote",
            Self::CleaningLocal => "Removing stale migration tags",
            Self::Planning => "Analyzing repository",
            Self::PushingMarkers => "Pushing migration tags",
            Self::PushingBranches => "Pushing branches",
            Self::PushingTags => "Pushing tags",
            Self::Verifying => "Verifying remote state",
            Self::CleaningUp => "Cleaning up migration tags",
            Self::Complete => "Done",
        })
    }
}

/// Status of one push operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    /// Push started
    Started,
    /// Push succeeded
    Success,
    /// An attempt failed and will be retried
    Retrying(String),
    /// Push failed after exhausting retries
    Failed(String),
}

impl fmt::Display for PushStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str("started"),
            Self::Success => f.write_str("done"),
            Self::Retrying(msg) => write!(f, "retrying: {msg}"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// Progress callback trait
pub trait ProgressCallback {
    /// Called when entering a new phase
    fn on_phase(&self, phase: Phase);

    /// Called as a push operation starts, retries, succeeds or fails;
    /// `what` is a human-readable description of the ref being pushed
    fn on_push(&self, what: &str, status: &PushStatus);

    /// Called with a general status message
    fn on_message(&self, message: &str);

    /// Monitor wired into the first attempt of each push for fine-grained
    /// object-transfer counts; later attempts are silent
    fn transfer_monitor(&self) -> Option<&dyn TransferMonitor> {
        None
    }
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_phase(&self, _phase: Phase) {}
    fn on_push(&self, _what: &str, _status: &PushStatus) {}
    fn on_message(&self, _message: &str) {}
}
