//! git2-backed implementation of the [`Backend`] trait

use crate::error::{Error, Result};
use crate::repo::{Backend, TransferMonitor};
use crate::types::{CommitId, PushKind, RefStatus, RefUpdate};
use git2::{BranchType, Oid, PushOptions, RemoteCallbacks, Repository};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Local namespace the remote's tags are fetched into during discovery
const SCRATCH_NAMESPACE: &str = "refs/stepwise/remote-tags/";

/// A local git repository opened through libgit2
pub struct GitBackend {
    repo: Repository,
}

impl GitBackend {
    /// Open the repository at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path).map_err(|source| Error::RepoOpen {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { repo })
    }

    fn oid(commit: &CommitId) -> Result<Oid> {
        Ok(Oid::from_str(commit.as_str())?)
    }

    /// Build the refspecs for one push operation
    fn refspecs(&self, kind: &PushKind) -> Result<Vec<String>> {
        Ok(match kind {
            PushKind::Branch(name) => {
                vec![format!("refs/heads/{name}:refs/heads/{name}")]
            }
            PushKind::Tag(name) => {
                vec![format!("refs/tags/{name}:refs/tags/{name}")]
            }
            PushKind::AllTags => self
                .local_tags("")?
                .into_iter()
                .map(|name| format!("refs/tags/{name}:refs/tags/{name}"))
                .collect(),
            PushKind::DeleteTags(names) => names
                .iter()
                .map(|name| format!(":refs/tags/{name}"))
                .collect(),
        })
    }
}

/// Destination ref of a `src:dst` refspec
fn destination(refspec: &str) -> &str {
    refspec.split_once(':').map_or(refspec, |(_, dst)| dst)
}

/// Classify a ref the remote accepted without complaint
fn accepted_status(refname: &str, kind: &PushKind) -> RefStatus {
    match kind {
        // A confirmed deletion leaves the remote in the requested state
        PushKind::DeleteTags(_) => RefStatus::UpToDate,
        _ if refname.starts_with("refs/tags/") => RefStatus::NewTag,
        _ => RefStatus::NewHead,
    }
}

impl Backend for GitBackend {
    fn head_commit(&self) -> Result<CommitId> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(CommitId::new(commit.id().to_string()))
    }

    fn branch_heads(&self) -> Result<Vec<(String, CommitId)>> {
        let mut heads = Vec::new();
        for entry in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            let Some(name) = branch.name()? else {
                continue;
            };
            let commit = branch.get().peel_to_commit()?;
            heads.push((name.to_string(), CommitId::new(commit.id().to_string())));
        }
        Ok(heads)
    }

    fn parents(&self, commit: &CommitId) -> Result<Vec<CommitId>> {
        let commit = self.repo.find_commit(Self::oid(commit)?)?;
        Ok(commit
            .parent_ids()
            .map(|id| CommitId::new(id.to_string()))
            .collect())
    }

    fn list_remote_tags(
        &self,
        remote: &str,
        prefix: &str,
    ) -> Result<BTreeMap<String, CommitId>> {
        let mut remote_handle =
            self.repo
                .find_remote(remote)
                .map_err(|source| Error::RemoteUnreachable {
                    remote: remote.to_string(),
                    source,
                })?;

        // Fetch matching tags into a scratch namespace and read them back as
        // local refs. Listing the remote's ref advertisement directly is not
        // an option: a freshly created, still-empty remote advertises no refs
        // and `Remote::list` cannot represent that.
        let refspec = format!("+refs/tags/{prefix}*:{SCRATCH_NAMESPACE}{prefix}*");
        // Tag auto-follow would route fetched tags to refs/tags/ and ignore
        // the scratch destination, so it must be disabled
        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.download_tags(git2::AutotagOption::None);
        remote_handle
            .fetch(&[refspec.as_str()], Some(&mut fetch_options), None)
            .map_err(|source| Error::RemoteUnreachable {
                remote: remote.to_string(),
                source,
            })?;

        let mut tags = BTreeMap::new();
        let mut scratch_refs = Vec::new();
        for entry in self.repo.references_glob(&format!("{SCRATCH_NAMESPACE}*"))? {
            let reference = entry?;
            let Some(full) = reference.name() else {
                continue;
            };
            let Some(name) = full.strip_prefix(SCRATCH_NAMESPACE) else {
                continue;
            };
            // Markers are lightweight tags, so this resolves to the commit
            // the remote tag points at
            let commit = reference.peel_to_commit()?;
            tags.insert(name.to_string(), CommitId::new(commit.id().to_string()));
            scratch_refs.push(full.to_string());
        }
        for full in scratch_refs {
            let mut reference = self.repo.find_reference(&full)?;
            reference.delete()?;
        }
        debug!("found {} migration tags on remote '{remote}'", tags.len());
        Ok(tags)
    }

    fn local_tags(&self, prefix: &str) -> Result<Vec<String>> {
        let pattern = format!("{prefix}*");
        let names = self.repo.tag_names(Some(&pattern))?;
        Ok(names.iter().flatten().map(String::from).collect())
    }

    fn create_tag(&self, name: &str, target: &CommitId) -> Result<()> {
        let object = self.repo.find_object(Self::oid(target)?, None)?;
        self.repo.tag_lightweight(name, &object, false)?;
        Ok(())
    }

    fn delete_tags(&self, names: &[String]) -> Result<()> {
        for name in names {
            self.repo.tag_delete(name)?;
        }
        Ok(())
    }

    fn push(
        &self,
        remote: &str,
        kind: &PushKind,
        monitor: Option<&dyn TransferMonitor>,
    ) -> Result<Vec<RefUpdate>> {
        let refspecs = self.refspecs(kind)?;
        if refspecs.is_empty() {
            return Ok(Vec::new());
        }

        let mut remote_handle =
            self.repo
                .find_remote(remote)
                .map_err(|source| Error::RemoteUnreachable {
                    remote: remote.to_string(),
                    source,
                })?;

        let reported: RefCell<Vec<RefUpdate>> = RefCell::new(Vec::new());
        let mut callbacks = RemoteCallbacks::new();
        callbacks.push_update_reference(|refname, status| {
            let status = status.map_or_else(
                || accepted_status(refname, kind),
                |msg| RefStatus::Rejected(msg.to_string()),
            );
            reported.borrow_mut().push(RefUpdate {
                refname: refname.to_string(),
                status,
            });
            Ok(())
        });
        if let Some(monitor) = monitor {
            callbacks.push_transfer_progress(move |current, total, bytes| {
                monitor.on_transfer(current, total, bytes);
            });
        }

        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);
        remote_handle.push(&refspecs, Some(&mut options))?;
        // The callbacks inside `options` borrow `reported`
        drop(options);

        // Refs the remote never mentioned were already up to date
        let mut updates = reported.into_inner();
        for refspec in &refspecs {
            let dst = destination(refspec);
            if !updates.iter().any(|u| u.refname == dst) {
                updates.push(RefUpdate {
                    refname: dst.to_string(),
                    status: RefStatus::UpToDate,
                });
            }
        }
        Ok(updates)
    }
}
