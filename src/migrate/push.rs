//! Push executor with bounded retries
//!
//! A push succeeds only if the backend reports every affected ref as
//! up-to-date, a new tag or a new branch head. Any rejected ref downgrades
//! the whole call to a failure, which is retried in place; exhausting the
//! retry limit is fatal for that ref.

use crate::error::{Error, Result};
use crate::migrate::progress::{ProgressCallback, PushStatus};
use crate::repo::Backend;
use crate::types::{PushKind, RefStatus, RefUpdate};
use tracing::warn;

/// Attempts per push before giving up
pub const PUSH_RETRY_LIMIT: u32 = 3;

/// Pushes refs to one remote with retry handling
pub struct Pusher<'a, B: Backend + ?Sized> {
    backend: &'a B,
    remote: String,
}

impl<'a, B: Backend + ?Sized> Pusher<'a, B> {
    /// Create a pusher targeting `remote`
    pub fn new(backend: &'a B, remote: &str) -> Self {
        Self {
            backend,
            remote: remote.to_string(),
        }
    }

    /// Push `kind`, retrying up to [`PUSH_RETRY_LIMIT`] times. The first
    /// attempt reports transfer progress, later attempts are silent.
    pub fn push_with_retries(&self, kind: &PushKind, progress: &dyn ProgressCallback) -> Result<()> {
        let what = kind.to_string();
        progress.on_push(&what, &PushStatus::Started);

        for attempt in 1..=PUSH_RETRY_LIMIT {
            let monitor = if attempt == 1 {
                progress.transfer_monitor()
            } else {
                None
            };

            match self.backend.push(&self.remote, kind, monitor) {
                Ok(updates) => {
                    if let Some(diagnostic) = first_rejection(&updates) {
                        warn!("push of {what} rejected (attempt {attempt}): {diagnostic}");
                        progress.on_push(&what, &PushStatus::Retrying(diagnostic));
                    } else {
                        progress.on_push(&what, &PushStatus::Success);
                        return Ok(());
                    }
                }
                // A missing or misconfigured remote will not fix itself
                Err(err @ Error::RemoteUnreachable { .. }) => return Err(err),
                Err(err) => {
                    warn!("push of {what} failed (attempt {attempt}): {err}");
                    progress.on_push(&what, &PushStatus::Retrying(err.to_string()));
                }
            }
        }

        progress.on_push(
            &what,
            &PushStatus::Failed(format!("gave up after {PUSH_RETRY_LIMIT} attempts")),
        );
        Err(Error::PushRetriesExhausted {
            what,
            attempts: PUSH_RETRY_LIMIT,
            remote: self.remote.clone(),
        })
    }
}

/// Diagnostic of the first rejected ref, if any
fn first_rejection(updates: &[RefUpdate]) -> Option<String> {
    updates.iter().find_map(|update| match &update.status {
        RefStatus::Rejected(msg) => Some(format!("{}: {msg}", update.refname)),
        _ => None,
    })
}
