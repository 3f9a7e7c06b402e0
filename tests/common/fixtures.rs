//! Test data factories: commit DAGs for the mock backend and real scratch
//! repositories built with git2

#![allow(dead_code)]

use crate::common::mock_backend::MockBackend;
use git2::{Oid, Repository, Signature};
use git_stepwise::types::CommitId;
use std::collections::HashMap;
use tempfile::TempDir;

/// Commit id `<prefix><n>` zero-padded, e.g. `c00042`
pub fn commit_id(n: usize, prefix: &str) -> CommitId {
    CommitId::new(format!("{prefix}{n:05}"))
}

/// Parent map for a linear chain `<prefix>00001` (root) .. `<prefix><n>`
pub fn chain_parents(n: usize, prefix: &str) -> HashMap<CommitId, Vec<CommitId>> {
    let mut parents = HashMap::new();
    parents.insert(commit_id(1, prefix), Vec::new());
    for i in 2..=n {
        parents.insert(commit_id(i, prefix), vec![commit_id(i - 1, prefix)]);
    }
    parents
}

/// Mock repository with one linear chain of `n` commits on branch `main`
pub fn linear_repo(n: usize) -> MockBackend {
    let head = commit_id(n, "c");
    MockBackend::new(
        chain_parents(n, "c"),
        head.clone(),
        vec![("main".to_string(), head)],
    )
}

/// Mock repository whose `main` head is a merge of two linear chains of
/// `len_a` and `len_b` commits
pub fn merge_repo(len_a: usize, len_b: usize) -> MockBackend {
    let mut parents = chain_parents(len_a, "a");
    parents.extend(chain_parents(len_b, "b"));
    let merge = CommitId::from("merge");
    parents.insert(
        merge.clone(),
        vec![commit_id(len_a, "a"), commit_id(len_b, "b")],
    );
    MockBackend::new(parents, merge.clone(), vec![("main".to_string(), merge)])
}

/// A scratch git repository in a temp directory
pub struct TestRepo {
    /// Directory holding the repository; dropped with the fixture
    pub dir: TempDir,
    /// The opened repository
    pub repo: Repository,
}

/// Initialize an empty repository
pub fn init_repo() -> TestRepo {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    TestRepo { dir, repo }
}

fn signature() -> Signature<'static> {
    Signature::now("Test Author", "test@example.com").unwrap()
}

/// Create a commit with an empty tree. Updates HEAD when `on_head` is set,
/// otherwise the commit is only reachable through later parents.
pub fn empty_commit(repo: &Repository, message: &str, parents: &[Oid], on_head: bool) -> Oid {
    let sig = signature();
    let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parent_commits: Vec<_> = parents
        .iter()
        .map(|oid| repo.find_commit(*oid).unwrap())
        .collect();
    let parent_refs: Vec<_> = parent_commits.iter().collect();
    repo.commit(
        if on_head { Some("HEAD") } else { None },
        &sig,
        &sig,
        message,
        &tree,
        &parent_refs,
    )
    .unwrap()
}

/// Commit a chain of `n` empty commits onto HEAD, returning the ids in order
/// (root first)
pub fn commit_chain(repo: &Repository, n: usize, label: &str) -> Vec<Oid> {
    let mut ids: Vec<Oid> = Vec::with_capacity(n);
    for i in 1..=n {
        let parents: Vec<Oid> = ids.last().copied().into_iter().collect();
        let id = empty_commit(repo, &format!("{label} {i}"), &parents, true);
        ids.push(id);
    }
    ids
}

/// Add a bare repository as a file remote named `name`; keep the returned
/// directory alive for the duration of the test
pub fn add_bare_remote(repo: &Repository, name: &str) -> (TempDir, Repository) {
    let dir = tempfile::tempdir().unwrap();
    let bare = Repository::init_bare(dir.path()).unwrap();
    repo.remote(name, dir.path().to_str().unwrap()).unwrap();
    (dir, bare)
}
