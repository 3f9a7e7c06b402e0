//! In-memory mock backend for testing

#![allow(dead_code)]

use git_stepwise::error::{Error, Result};
use git_stepwise::repo::{Backend, TransferMonitor};
use git_stepwise::types::{CommitId, PushKind, RefStatus, RefUpdate};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// In-memory backend with a fixed commit DAG, a simulated remote, call
/// tracking and error injection
///
/// Features:
/// - push effects applied to an in-memory "remote" (tags, branches)
/// - every push call recorded for ordering assertions
/// - configurable transient failures per push kind
/// - discovery failure injection for configuration-error paths
pub struct MockBackend {
    parents: HashMap<CommitId, Vec<CommitId>>,
    head: CommitId,
    branches: Vec<(String, CommitId)>,
    local_tags: Mutex<BTreeMap<String, CommitId>>,
    remote_tags: Mutex<BTreeMap<String, CommitId>>,
    remote_branches: Mutex<BTreeMap<String, CommitId>>,
    // Call tracking
    pushes: Mutex<Vec<PushKind>>,
    created_tags: Mutex<Vec<String>>,
    // Error injection
    fail_discovery: Mutex<bool>,
    push_failures: Mutex<HashMap<String, u32>>,
}

impl MockBackend {
    /// Build a mock over the given DAG; `head` is what HEAD points at
    pub fn new(
        parents: HashMap<CommitId, Vec<CommitId>>,
        head: CommitId,
        branches: Vec<(String, CommitId)>,
    ) -> Self {
        Self {
            parents,
            head,
            branches,
            local_tags: Mutex::new(BTreeMap::new()),
            remote_tags: Mutex::new(BTreeMap::new()),
            remote_branches: Mutex::new(BTreeMap::new()),
            pushes: Mutex::new(Vec::new()),
            created_tags: Mutex::new(Vec::new()),
            fail_discovery: Mutex::new(false),
            push_failures: Mutex::new(HashMap::new()),
        }
    }

    // === Error injection ===

    /// Make `list_remote_tags` fail, simulating an unreachable remote
    pub fn fail_discovery(&self) {
        *self.fail_discovery.lock().unwrap() = true;
    }

    /// Make the next `times` pushes of the operation described by `what`
    /// (the `PushKind` display form, e.g. `"branch main"`) fail transiently
    pub fn fail_push(&self, what: &str, times: u32) {
        self.push_failures
            .lock()
            .unwrap()
            .insert(what.to_string(), times);
    }

    /// Stop injecting failures for `what`
    pub fn heal_push(&self, what: &str) {
        self.push_failures.lock().unwrap().remove(what);
    }

    // === Remote state seeding / inspection ===

    /// Pretend a prior run already pushed this marker tag
    pub fn seed_remote_tag(&self, name: &str, commit: &str) {
        self.remote_tags
            .lock()
            .unwrap()
            .insert(name.to_string(), CommitId::from(commit));
    }

    /// Tag names currently on the simulated remote
    pub fn remote_tag_names(&self) -> Vec<String> {
        self.remote_tags.lock().unwrap().keys().cloned().collect()
    }

    /// Branch heads currently on the simulated remote
    pub fn remote_branch(&self, name: &str) -> Option<CommitId> {
        self.remote_branches.lock().unwrap().get(name).cloned()
    }

    /// Local tag names
    pub fn local_tag_names(&self) -> Vec<String> {
        self.local_tags.lock().unwrap().keys().cloned().collect()
    }

    // === Call verification ===

    /// Every push call in order
    pub fn pushes(&self) -> Vec<PushKind> {
        self.pushes.lock().unwrap().clone()
    }

    /// Every locally created tag in creation order
    pub fn created_tags(&self) -> Vec<String> {
        self.created_tags.lock().unwrap().clone()
    }

    /// Forget recorded calls (keeps repository and remote state)
    pub fn clear_tracking(&self) {
        self.pushes.lock().unwrap().clear();
        self.created_tags.lock().unwrap().clear();
    }

    fn transient(msg: &str) -> Error {
        Error::Git(git2::Error::from_str(msg))
    }

    fn push_tag_effect(&self, name: &str) -> RefUpdate {
        let refname = format!("refs/tags/{name}");
        let Some(target) = self.local_tags.lock().unwrap().get(name).cloned() else {
            return RefUpdate {
                refname,
                status: RefStatus::Rejected("no such local tag".to_string()),
            };
        };
        let mut remote = self.remote_tags.lock().unwrap();
        let status = if remote.get(name) == Some(&target) {
            RefStatus::UpToDate
        } else {
            remote.insert(name.to_string(), target);
            RefStatus::NewTag
        };
        RefUpdate { refname, status }
    }
}

impl Backend for MockBackend {
    fn head_commit(&self) -> Result<CommitId> {
        Ok(self.head.clone())
    }

    fn branch_heads(&self) -> Result<Vec<(String, CommitId)>> {
        Ok(self.branches.clone())
    }

    fn parents(&self, commit: &CommitId) -> Result<Vec<CommitId>> {
        Ok(self.parents.get(commit).cloned().unwrap_or_default())
    }

    fn list_remote_tags(
        &self,
        remote: &str,
        prefix: &str,
    ) -> Result<BTreeMap<String, CommitId>> {
        if *self.fail_discovery.lock().unwrap() {
            return Err(Error::RemoteUnreachable {
                remote: remote.to_string(),
                source: git2::Error::from_str("mock: remote unreachable"),
            });
        }
        Ok(self
            .remote_tags
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, commit)| (name.clone(), commit.clone()))
            .collect())
    }

    fn local_tags(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .local_tags
            .lock()
            .unwrap()
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn create_tag(&self, name: &str, target: &CommitId) -> Result<()> {
        self.local_tags
            .lock()
            .unwrap()
            .insert(name.to_string(), target.clone());
        self.created_tags.lock().unwrap().push(name.to_string());
        Ok(())
    }

    fn delete_tags(&self, names: &[String]) -> Result<()> {
        let mut tags = self.local_tags.lock().unwrap();
        for name in names {
            tags.remove(name);
        }
        Ok(())
    }

    fn push(
        &self,
        _remote: &str,
        kind: &PushKind,
        _monitor: Option<&dyn TransferMonitor>,
    ) -> Result<Vec<RefUpdate>> {
        self.pushes.lock().unwrap().push(kind.clone());

        let what = kind.to_string();
        {
            let mut failures = self.push_failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(&what) {
                if *remaining > 0 {
                    *remaining = remaining.saturating_sub(1);
                    return Err(Self::transient("mock: transient push failure"));
                }
            }
        }

        Ok(match kind {
            PushKind::Tag(name) => vec![self.push_tag_effect(name)],
            PushKind::AllTags => {
                let names: Vec<String> = self.local_tags.lock().unwrap().keys().cloned().collect();
                names
                    .iter()
                    .map(|name| self.push_tag_effect(name))
                    .collect()
            }
            PushKind::Branch(name) => {
                let target = self
                    .branches
                    .iter()
                    .find(|(branch, _)| branch == name)
                    .map(|(_, commit)| commit.clone())
                    .unwrap_or_else(|| self.head.clone());
                let mut remote = self.remote_branches.lock().unwrap();
                let status = if remote.get(name) == Some(&target) {
                    RefStatus::UpToDate
                } else {
                    remote.insert(name.clone(), target);
                    RefStatus::NewHead
                };
                vec![RefUpdate {
                    refname: format!("refs/heads/{name}"),
                    status,
                }]
            }
            PushKind::DeleteTags(names) => {
                let mut remote = self.remote_tags.lock().unwrap();
                names
                    .iter()
                    .map(|name| {
                        remote.remove(name);
                        RefUpdate {
                            refname: format!("refs/tags/{name}"),
                            status: RefStatus::UpToDate,
                        }
                    })
                    .collect()
            }
        })
    }
}
