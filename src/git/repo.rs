//! Local repository plumbing for the publish workspace.

use super::tree::TreeBuilder;
use anyhow::{Result, anyhow, bail};
use gix::{
    Repository, ThreadSafeRepository, commit::NO_PARENT_IDS, index::State,
    refs::transaction::PreviousValue,
};
use std::path::Path;

/// Ref tracking the last-fetched remote branch head.
///
/// The remote branch is fetched here instead of a local branch so git never
/// refuses the fetch for touching a checked-out branch.
pub const UPSTREAM_REF: &str = "refs/folio/upstream";

/// Create a new git repository at the given path
pub fn create_repo(root: &Path) -> Result<ThreadSafeRepository> {
    let repo = gix::init(root)?;
    Ok(repo.into_sync())
}

/// Open an existing git repository
pub fn open_repo(root: &Path) -> Result<ThreadSafeRepository> {
    let repo = gix::open(root)?;
    Ok(repo.into_sync())
}

/// Open the repository at `root`, initializing it on first use.
pub fn open_or_create(root: &Path) -> Result<ThreadSafeRepository> {
    if root.join(".git").exists() {
        open_repo(root)
    } else {
        create_repo(root)
    }
}

/// Build and store the tree for the repository's working directory.
///
/// Writes blobs and trees into the object database and refreshes the index
/// file, returning the root tree id. Nothing is committed.
pub fn write_worktree_tree(repo: &ThreadSafeRepository) -> Result<gix::ObjectId> {
    let repo_local = repo.to_thread_local();
    let root = get_repo_root(&repo_local)?;

    let mut index = State::new(repo_local.object_hash());
    let tree = TreeBuilder::new(repo).build_from_dir(root, &mut index)?;
    index.sort_entries();

    let mut index_file = gix::index::File::from_state(index, repo_local.index_path());
    index_file.write(gix::index::write::Options::default())?;

    let tree_id = repo_local.write_object(&tree)?.detach();
    Ok(tree_id)
}

/// Commit the given tree on HEAD, parented on the fetched upstream head.
pub fn commit_tree(
    repo: &ThreadSafeRepository,
    tree_id: gix::ObjectId,
    message: &str,
) -> Result<gix::ObjectId> {
    if message.trim().is_empty() {
        bail!("Commit message cannot be empty");
    }

    let repo_local = repo.to_thread_local();
    let parent_ids = ref_commit_id(&repo_local, UPSTREAM_REF)
        .map(|id| vec![id])
        .unwrap_or_else(|| NO_PARENT_IDS.to_vec());

    let commit_id = repo_local
        .commit("HEAD", message, tree_id, parent_ids)?
        .detach();
    Ok(commit_id)
}

/// Get repository root path
pub(crate) fn get_repo_root(repo: &Repository) -> Result<&Path> {
    repo.path()
        .parent()
        .ok_or_else(|| anyhow!("Invalid repository path"))
}

/// Commit id a ref points at, if the ref exists.
pub fn ref_commit_id(repo: &Repository, refname: &str) -> Option<gix::ObjectId> {
    let mut reference = repo.find_reference(refname).ok()?;
    reference.peel_to_id_in_place().ok().map(|id| id.detach())
}

/// Tree id of the commit a ref points at, if the ref exists.
pub fn ref_tree_id(repo: &Repository, refname: &str) -> Result<Option<gix::ObjectId>> {
    let Some(commit_id) = ref_commit_id(repo, refname) else {
        return Ok(None);
    };
    let commit = repo.find_object(commit_id)?.into_commit();
    Ok(Some(commit.tree_id()?.detach()))
}

/// Delete a ref if it exists (stale upstream after remote branch removal).
pub fn delete_ref(repo: &Repository, refname: &str) -> Result<()> {
    if let Ok(reference) = repo.find_reference(refname) {
        reference.delete()?;
    }
    Ok(())
}

/// Point the checked-out branch at `id`.
///
/// `commit_tree` updates HEAD expecting its previous value to match the
/// first parent, so the local branch must track the fetched upstream head
/// before committing on top of it.
pub fn reset_head_branch(repo: &Repository, id: gix::ObjectId) -> Result<()> {
    let Some(name) = repo.head_name()? else {
        bail!("workspace HEAD is detached");
    };
    repo.reference(
        name.as_bstr().to_string().as_str(),
        id,
        PreviousValue::Any,
        "folio: sync to upstream",
    )?;
    Ok(())
}

/// Remove the checked-out branch ref (the remote branch vanished, the next
/// commit starts an unborn branch again).
pub fn clear_head_branch(repo: &Repository) -> Result<()> {
    if let Some(name) = repo.head_name()? {
        delete_ref(repo, &name.as_bstr().to_string())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_commit_requires_message() {
        let dir = tempfile::tempdir().unwrap();
        let repo = create_repo(dir.path()).unwrap();
        let tree_id = write_worktree_tree(&repo).unwrap();
        assert!(commit_tree(&repo, tree_id, "  ").is_err());
    }

    #[test]
    fn test_worktree_tree_reflects_contents() {
        let dir = tempfile::tempdir().unwrap();
        let repo = create_repo(dir.path()).unwrap();

        let empty_tree = write_worktree_tree(&repo).unwrap();

        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        let one_file = write_worktree_tree(&repo).unwrap();
        assert_ne!(empty_tree, one_file);

        // Identical contents produce the identical tree id
        let again = write_worktree_tree(&repo).unwrap();
        assert_eq!(one_file, again);
    }

    #[test]
    fn test_commit_and_ref_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let repo = create_repo(dir.path()).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let tree_id = write_worktree_tree(&repo).unwrap();
        let commit_id = commit_tree(&repo, tree_id, "publish: 1 added").unwrap();

        let local = repo.to_thread_local();
        let head_id = ref_commit_id(&local, "HEAD").unwrap();
        assert_eq!(head_id, commit_id);
        assert_eq!(ref_tree_id(&local, "HEAD").unwrap(), Some(tree_id));
    }
}
