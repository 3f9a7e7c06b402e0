//! Commit ancestry walker
//!
//! Traverses from a branch head toward the roots, splitting history into
//! batches at merge commits, at the batch-size target, and at commits some
//! earlier walk already covered. The traversal uses an explicit frame stack
//! rather than recursion so arbitrarily deep histories cannot overflow the
//! call stack.

use crate::error::Result;
use crate::migrate::plan_rollup;
use crate::repo::Backend;
use crate::types::{Batch, CommitId};
use std::collections::HashSet;
use tracing::debug;

/// The one ancestry query the walker needs from a backend
pub trait Ancestry {
    /// Parent commits of `commit`, empty for a root
    fn parents(&self, commit: &CommitId) -> Result<Vec<CommitId>>;
}

impl<B: Backend + ?Sized> Ancestry for B {
    fn parents(&self, commit: &CommitId) -> Result<Vec<CommitId>> {
        Backend::parents(self, commit)
    }
}

/// A traversal frame on the explicit stack
///
/// `Enter` examines a commit and schedules its ancestor work; `Resolve` runs
/// after all of that work has completed and hands the commit, its own linear
/// run and its ancestors' still-pending batches to the planner.
enum Frame {
    Enter(CommitId),
    Resolve {
        commit: CommitId,
        own_count: usize,
        mark: usize,
    },
}

/// Walks commit ancestry and discovers batch boundaries
///
/// The visited set persists across [`AncestryWalker::walk`] calls, so walking
/// several branch heads with one walker never batches shared history twice.
pub struct AncestryWalker {
    target: usize,
    tolerance: usize,
    visited: HashSet<CommitId>,
}

impl AncestryWalker {
    /// Create a walker for the given batch-size target
    ///
    /// The tolerance window is 5% of the target (rounded down).
    pub fn new(target: usize) -> Self {
        Self {
            target: target.max(1),
            tolerance: target / 20,
            visited: HashSet::new(),
        }
    }

    /// Number of commits already incorporated into some batch
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Walk from `head` toward the roots, reporting finalized batches through
    /// `finalize` and returning the batches still pending for this head.
    ///
    /// Returns an empty list immediately when `head` was already visited.
    pub fn walk<A, F>(
        &mut self,
        ancestry: &A,
        head: &CommitId,
        finalize: &mut F,
    ) -> Result<Vec<Batch>>
    where
        A: Ancestry + ?Sized,
        F: FnMut(&[Batch]) -> Result<()>,
    {
        let mut pending: Vec<Batch> = Vec::new();
        let mut stack = vec![Frame::Enter(head.clone())];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(commit) => {
                    if self.visited.contains(&commit) {
                        continue;
                    }
                    let parents = ancestry.parents(&commit)?;
                    let mark = pending.len();
                    if parents.len() >= 2 {
                        // Merge commit: every parent's pending work must be
                        // fully resolved before this commit combines it
                        stack.push(Frame::Resolve {
                            commit,
                            own_count: 1,
                            mark,
                        });
                        for parent in parents {
                            stack.push(Frame::Enter(parent));
                        }
                    } else if let Some(parent) = parents.into_iter().next() {
                        let (stop, skipped) = self.advance_linear(ancestry, parent)?;
                        stack.push(Frame::Resolve {
                            commit,
                            own_count: 1 + skipped,
                            mark,
                        });
                        stack.push(Frame::Enter(stop));
                    } else {
                        // Root commit: terminates the traversal on this line
                        stack.push(Frame::Resolve {
                            commit,
                            own_count: 1,
                            mark,
                        });
                    }
                }
                Frame::Resolve {
                    commit,
                    own_count,
                    mark,
                } => {
                    self.visited.insert(commit.clone());
                    // Everything past `mark` was contributed by this commit's
                    // ancestors while their frames ran
                    let inherited = pending.split_off(mark);
                    let decision =
                        plan_rollup(commit, own_count, inherited, self.target, self.tolerance);
                    if !decision.finalize.is_empty() {
                        debug!(
                            "finalizing {} batch(es) covering {} commits",
                            decision.finalize.len(),
                            decision.finalize.iter().map(|b| b.commits).sum::<usize>()
                        );
                        finalize(&decision.finalize)?;
                    }
                    pending.extend(decision.pending);
                }
            }
        }

        Ok(pending)
    }

    /// Advance through single-parent ancestors starting at `commit`, marking
    /// each advanced-over commit visited, until hitting a merge commit, a
    /// root, a visited commit, or the batch-size cap.
    ///
    /// The cap keeps the full linear run (the representative commit plus the
    /// commits returned here) at exactly the batch target.
    fn advance_linear<A>(&mut self, ancestry: &A, mut commit: CommitId) -> Result<(CommitId, usize)>
    where
        A: Ancestry + ?Sized,
    {
        let limit = self.target - 1;
        let mut count = 0;

        while count < limit && !self.visited.contains(&commit) {
            let mut parents = ancestry.parents(&commit)?;
            if parents.len() != 1 {
                break;
            }
            count += 1;
            self.visited.insert(commit.clone());
            commit = parents.swap_remove(0);
        }

        Ok((commit, count))
    }
}
