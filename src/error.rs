//! Error types for git-stepwise

use crate::types::CommitId;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// All errors that can occur during a migration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote could not be contacted at discovery time. Nothing has been
    /// mutated when this is raised.
    #[error(
        "could not contact the remote repository '{remote}'. The most common reasons for this \
         error are that the name of the remote repository is incorrect, or that you do not have \
         permissions to interact with that remote repository: {source}"
    )]
    RemoteUnreachable {
        /// Name of the remote that failed
        remote: String,
        /// Underlying git error
        #[source]
        source: git2::Error,
    },

    /// A migration marker on the remote points at a different commit than the
    /// one planned locally. Usually means the batch size changed between runs.
    #[error(
        "migration tag '{name}' on the remote points at {remote_commit} but the local plan \
         expects {local_commit}. Most likely your batch size has changed since the last run. \
         Run with --clean and try again"
    )]
    MarkerConflict {
        /// Conflicting marker name
        name: String,
        /// Commit the local plan assigned to this marker
        local_commit: CommitId,
        /// Commit recorded on the remote for this marker
        remote_commit: CommitId,
    },

    /// A push kept failing after the configured number of attempts
    #[error("pushing {what} failed after {attempts} attempts. For more information, run: git push {remote} {what}")]
    PushRetriesExhausted {
        /// Human-readable description of what was being pushed
        what: String,
        /// Number of attempts made
        attempts: u32,
        /// Remote the push targeted
        remote: String,
    },

    /// The repository at the given path could not be opened
    #[error("failed to open git repository at '{path}': {source}")]
    RepoOpen {
        /// Path that was tried
        path: String,
        /// Underlying git error
        #[source]
        source: git2::Error,
    },

    /// Any other error from the git backend
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}
