//! Worktree mirroring.
//!
//! Makes the publish worktree byte-for-byte reflect the build output
//! directory: new files are copied in, changed files overwritten, stale
//! files deleted. Byte-identical files are left untouched so re-publishing
//! unchanged content does not churn the worktree.

use crate::utils::hash;
use jwalk::WalkDir;
use rustc_hash::FxHashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Counters for one mirror pass. Feeds the generated commit message.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl SyncStats {
    /// Number of files whose worktree state changed.
    pub fn changed(&self) -> usize {
        self.added + self.updated + self.removed
    }
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.changed() == 0 {
            return write!(f, "no changes");
        }
        let mut parts = Vec::new();
        if self.added > 0 {
            parts.push(format!("{} added", self.added));
        }
        if self.updated > 0 {
            parts.push(format!("{} updated", self.updated));
        }
        if self.removed > 0 {
            parts.push(format!("{} removed", self.removed));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Mirror `source` into `worktree`.
///
/// The worktree's `.git` directory is preserved; everything else ends up
/// set-equal to `source`. Empty directories left behind by deletions are
/// pruned (git does not track them anyway).
pub fn mirror(source: &Path, worktree: &Path) -> io::Result<SyncStats> {
    let mut stats = SyncStats::default();
    let mut keep: FxHashSet<PathBuf> = FxHashSet::default();

    // Copy pass: add new files, overwrite changed ones
    for entry in WalkDir::new(source).sort(true) {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path
            .strip_prefix(source)
            .map_err(io::Error::other)?
            .to_path_buf();
        let dest = worktree.join(&relative);
        keep.insert(relative);

        if dest.is_file() {
            if hash::same_contents(&path, &dest)? {
                stats.unchanged += 1;
            } else {
                fs::copy(&path, &dest)?;
                stats.updated += 1;
            }
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&path, &dest)?;
            stats.added += 1;
        }
    }

    // Deletion pass: remove files absent from source
    let mut dirs = Vec::new();
    let walker = WalkDir::new(worktree)
        .sort(true)
        .process_read_dir(|_depth, _path, _state, children| {
            children.retain(|child| {
                child
                    .as_ref()
                    .map(|entry| entry.file_name() != ".git")
                    .unwrap_or(true)
            });
        });

    for entry in walker {
        let entry = entry.map_err(io::Error::other)?;
        let path = entry.path();
        if path == worktree {
            continue;
        }
        if entry.file_type().is_dir() {
            dirs.push(path);
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = path.strip_prefix(worktree).map_err(io::Error::other)?;
        if !keep.contains(relative) {
            fs::remove_file(&path)?;
            stats.removed += 1;
        }
    }

    // Prune now-empty directories, deepest first
    dirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
    for dir in dirs {
        let _ = fs::remove_dir(&dir);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_initial_mirror_adds_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("src");
        let worktree = tmp.path().join("wt");
        fs::create_dir_all(&worktree).unwrap();
        write(&source.join("index.html"), "<html>");
        write(&source.join("posts/hello/index.html"), "hi");

        let stats = mirror(&source, &worktree).unwrap();

        assert_eq!(stats.added, 2);
        assert_eq!(stats.changed(), 2);
        assert!(worktree.join("posts/hello/index.html").is_file());
    }

    #[test]
    fn test_rerun_is_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("src");
        let worktree = tmp.path().join("wt");
        fs::create_dir_all(&worktree).unwrap();
        write(&source.join("a.txt"), "a");

        mirror(&source, &worktree).unwrap();
        let stats = mirror(&source, &worktree).unwrap();

        assert_eq!(stats.changed(), 0);
        assert_eq!(stats.unchanged, 1);
        assert_eq!(format!("{stats}"), "no changes");
    }

    #[test]
    fn test_deletion_propagates() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("src");
        let worktree = tmp.path().join("wt");
        fs::create_dir_all(&worktree).unwrap();
        write(&source.join("a.txt"), "a");
        write(&source.join("old/b.txt"), "b");
        mirror(&source, &worktree).unwrap();

        fs::remove_file(source.join("old/b.txt")).unwrap();
        fs::remove_dir(source.join("old")).unwrap();
        let stats = mirror(&source, &worktree).unwrap();

        assert_eq!(stats.removed, 1);
        assert!(!worktree.join("old/b.txt").exists());
        // Empty directory is pruned too
        assert!(!worktree.join("old").exists());
        assert!(worktree.join("a.txt").is_file());
    }

    #[test]
    fn test_git_dir_preserved() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("src");
        let worktree = tmp.path().join("wt");
        fs::create_dir_all(&source).unwrap();
        write(&worktree.join(".git/HEAD"), "ref: refs/heads/main");
        write(&worktree.join("stale.txt"), "stale");

        let stats = mirror(&source, &worktree).unwrap();

        assert_eq!(stats.removed, 1);
        assert!(worktree.join(".git/HEAD").is_file());
    }

    #[test]
    fn test_update_counts_changed_content() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("src");
        let worktree = tmp.path().join("wt");
        fs::create_dir_all(&worktree).unwrap();
        write(&source.join("a.txt"), "v1");
        mirror(&source, &worktree).unwrap();

        write(&source.join("a.txt"), "v2");
        let stats = mirror(&source, &worktree).unwrap();

        assert_eq!(stats.updated, 1);
        assert_eq!(fs::read_to_string(worktree.join("a.txt")).unwrap(), "v2");
        assert_eq!(format!("{stats}"), "1 updated");
    }
}
