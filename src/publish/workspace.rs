//! Publish workspace management.
//!
//! Each remote/branch pair gets a cached scratch repository under
//! `.folio/publish/<fingerprint>`. It is reused across invocations so only
//! changed blobs are rewritten; `deploy --force` discards and re-creates it.

use crate::git::{self, FetchOutcome};
use crate::publish::PublishError;
use crate::utils::hash;
use gix::ThreadSafeRepository;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A scratch checkout bound to one remote/branch pair.
pub struct Workspace {
    pub dir: PathBuf,
    pub repo: ThreadSafeRepository,
    /// Head of the remote branch as of the fetch; `None` when the branch
    /// does not exist remotely yet.
    pub base: Option<gix::ObjectId>,
}

/// Acquire the workspace for `remote_url`/`branch`, fetching the branch head.
///
/// `remote_url` may carry injected credentials; `display_url` is what gets
/// logged and keyed on.
pub fn acquire(
    cache_dir: &Path,
    remote_url: &str,
    display_url: &str,
    branch: &str,
    force: bool,
    timeout: Option<Duration>,
) -> Result<Workspace, PublishError> {
    let key = hash::fingerprint(&format!("{display_url}|{branch}"));
    let dir = cache_dir.join("publish").join(key);

    if force && dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir)?;

    let repo = git::open_or_create(&dir).map_err(|e| PublishError::Git(format!("{e:#}")))?;

    let base = match git::fetch(&dir, remote_url, display_url, branch, timeout)? {
        FetchOutcome::Updated => {
            let local = repo.to_thread_local();
            let id = git::ref_commit_id(&local, git::UPSTREAM_REF).ok_or_else(|| {
                PublishError::Git("fetch succeeded but upstream ref is missing".into())
            })?;
            git::reset_head_branch(&local, id)
                .map_err(|e| PublishError::Git(format!("{e:#}")))?;
            Some(id)
        }
        FetchOutcome::NoBranch => {
            // Remote branch deleted since the last publish: drop the stale refs
            let local = repo.to_thread_local();
            git::delete_ref(&local, git::UPSTREAM_REF)
                .map_err(|e| PublishError::Git(format!("{e:#}")))?;
            git::clear_head_branch(&local)
                .map_err(|e| PublishError::Git(format!("{e:#}")))?;
            None
        }
    };

    Ok(Workspace { dir, repo, base })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_keyed_by_remote_and_branch() {
        let a = hash::fingerprint("https://example.com/a.git|gh-pages");
        let b = hash::fingerprint("https://example.com/a.git|master");
        assert_ne!(a, b);
    }
}
