//! Git operations for the publish workspace.
//!
//! Local plumbing (init, tree building, commits) uses gix; network
//! transport (fetch, push) shells out to the system git binary so ambient
//! credentials keep working.

mod remote;
mod repo;
mod tree;

pub use remote::{FetchOutcome, fetch, push};
pub use repo::{
    UPSTREAM_REF, clear_head_branch, commit_tree, create_repo, delete_ref, open_or_create,
    open_repo, ref_commit_id, ref_tree_id, reset_head_branch, write_worktree_tree,
};
