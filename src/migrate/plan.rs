//! Batch rollup planning
//!
//! Decides, for one resolved commit, whether its pending ancestor batches get
//! rolled into it, flushed now, or fanned out into individual batches. Pure
//! so the decision table is unit-testable without a repository.

use crate::types::{Batch, CommitId};

/// What the planner decided for one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupDecision {
    /// Batches to finalize now, in marker allocation order
    pub finalize: Vec<Batch>,
    /// Batches still eligible for rolling into a later commit
    pub pending: Vec<Batch>,
}

/// Apply the rollup decision table.
///
/// `own_count` is the commit's own linear-run contribution (including
/// itself), `pending` the ancestor batches not yet finalized, `target` the
/// configured batch size and `tolerance` the acceptable overshoot.
///
/// Rules, checked in order over `total = own_count + sum(pending)`:
/// 1. `total < target` - absorb everything into one new pending batch.
/// 2. `total <= target + tolerance` - finalize one batch covering the whole
///    rolled-up total.
/// 3. `own_count >= target` - the commit's own run alone meets the target:
///    finalize every pending ancestor individually, then the commit itself.
/// 4. Otherwise - finalize every pending ancestor individually but keep the
///    commit's own run pending, since it alone is still under target.
pub fn plan_rollup(
    commit: CommitId,
    own_count: usize,
    pending: Vec<Batch>,
    target: usize,
    tolerance: usize,
) -> RollupDecision {
    let total: usize = own_count + pending.iter().map(|b| b.commits).sum::<usize>();

    if total < target {
        return RollupDecision {
            finalize: Vec::new(),
            pending: vec![Batch { head: commit, commits: total }],
        };
    }

    if total <= target + tolerance {
        return RollupDecision {
            finalize: vec![Batch { head: commit, commits: total }],
            pending: Vec::new(),
        };
    }

    if own_count >= target {
        let mut finalize = pending;
        finalize.push(Batch { head: commit, commits: own_count });
        return RollupDecision {
            finalize,
            pending: Vec::new(),
        };
    }

    RollupDecision {
        finalize: pending,
        pending: vec![Batch { head: commit, commits: own_count }],
    }
}
