//! Remote transport via the system git binary.
//!
//! gix handles all local plumbing; clone-less fetch and push go through the
//! installed `git` so ambient credential helpers (ssh agent, credential
//! manager) keep working. Failures are classified from stderr into the
//! publish error taxonomy.

use super::repo::UPSTREAM_REF;
use crate::debug;
use crate::publish::PublishError;
use crate::utils::exec::{Cmd, CommandTimeout};
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::OnceLock;
use std::time::Duration;

/// Locate the git binary once.
fn git_binary() -> Result<&'static Path, PublishError> {
    static GIT: OnceLock<Option<PathBuf>> = OnceLock::new();
    GIT.get_or_init(|| which::which("git").ok())
        .as_deref()
        .ok_or_else(|| PublishError::Git("`git` binary not found in PATH".into()))
}

/// Result of fetching the remote branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The branch exists; `refs/folio/upstream` now points at its head.
    Updated,
    /// The branch does not exist on the remote yet (first publish).
    NoBranch,
}

/// Fetch `branch` from `remote_url` into the upstream tracking ref.
pub fn fetch(
    workdir: &Path,
    remote_url: &str,
    display_url: &str,
    branch: &str,
    timeout: Option<Duration>,
) -> Result<FetchOutcome, PublishError> {
    let refspec = format!("+refs/heads/{branch}:{UPSTREAM_REF}");
    let output = run_git(workdir, &["fetch", remote_url, refspec.as_str()], timeout)?;

    if output.status.success() {
        debug!("git"; "fetched {branch} from {display_url}");
        return Ok(FetchOutcome::Updated);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if is_missing_branch(&stderr) {
        debug!("git"; "branch {branch} not found on {display_url}, will create it");
        return Ok(FetchOutcome::NoBranch);
    }

    Err(classify_failure(&stderr, display_url, branch))
}

/// Push the local HEAD to `branch` on `remote_url`.
pub fn push(
    workdir: &Path,
    remote_url: &str,
    display_url: &str,
    branch: &str,
    force: bool,
    timeout: Option<Duration>,
) -> Result<(), PublishError> {
    let refspec = format!("HEAD:refs/heads/{branch}");
    let mut args = vec!["push", remote_url, refspec.as_str()];
    if force {
        args.push("--force");
    }

    let output = run_git(workdir, &args, timeout)?;
    if output.status.success() {
        debug!("git"; "pushed {branch} to {display_url}");
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(classify_failure(&stderr, display_url, branch))
}

/// Run git with the given args, mapping timeouts into the publish taxonomy.
fn run_git(
    workdir: &Path,
    args: &[&str],
    timeout: Option<Duration>,
) -> Result<Output, PublishError> {
    let git = git_binary()?;
    Cmd::new(git)
        .args(args)
        .cwd(workdir)
        .timeout(timeout)
        .run_unchecked()
        .map_err(|err| match err.downcast_ref::<CommandTimeout>() {
            Some(t) => PublishError::Timeout { secs: t.secs },
            None => PublishError::Git(format!("{err:#}")),
        })
}

fn is_missing_branch(stderr: &str) -> bool {
    let stderr = stderr.to_ascii_lowercase();
    stderr.contains("couldn't find remote ref") || stderr.contains("no such ref")
}

/// Map git transport stderr onto the publish error taxonomy.
fn classify_failure(stderr: &str, remote: &str, branch: &str) -> PublishError {
    let lower = stderr.to_ascii_lowercase();
    let detail = stderr.trim().to_string();

    const AUTH: &[&str] = &[
        "authentication failed",
        "could not read username",
        "could not read password",
        "permission denied",
        "access denied",
        "invalid username or password",
        "403",
    ];
    const CONFLICT: &[&str] = &[
        "non-fast-forward",
        "[rejected]",
        "fetch first",
        "stale info",
    ];
    const NETWORK: &[&str] = &[
        "could not resolve host",
        "connection refused",
        "connection timed out",
        "operation timed out",
        "network is unreachable",
        "early eof",
        "remote end hung up",
        "could not read from remote repository",
    ];

    if AUTH.iter().any(|p| lower.contains(p)) {
        return PublishError::Auth {
            remote: remote.to_string(),
            detail,
        };
    }
    if CONFLICT.iter().any(|p| lower.contains(p)) {
        return PublishError::Conflict {
            branch: branch.to_string(),
            detail,
        };
    }
    if NETWORK.iter().any(|p| lower.contains(p)) {
        return PublishError::Network {
            remote: remote.to_string(),
            detail,
        };
    }

    PublishError::Git(detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_auth() {
        let err = classify_failure(
            "fatal: Authentication failed for 'https://github.com/u/r.git/'",
            "https://github.com/u/r.git",
            "gh-pages",
        );
        assert!(matches!(err, PublishError::Auth { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_classify_non_fast_forward() {
        let stderr = " ! [rejected]        HEAD -> gh-pages (non-fast-forward)\n\
                      error: failed to push some refs";
        let err = classify_failure(stderr, "origin", "gh-pages");
        assert!(matches!(err, PublishError::Conflict { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_classify_network() {
        let err = classify_failure(
            "fatal: unable to access 'https://github.com/u/r.git/': Could not resolve host: github.com",
            "https://github.com/u/r.git",
            "gh-pages",
        );
        assert!(matches!(err, PublishError::Network { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_classify_unknown_is_fatal() {
        let err = classify_failure("fatal: bad object refs/heads/gh-pages", "origin", "gh-pages");
        assert!(matches!(err, PublishError::Git(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_missing_branch_detection() {
        assert!(is_missing_branch(
            "fatal: couldn't find remote ref refs/heads/gh-pages"
        ));
        assert!(!is_missing_branch("fatal: repository not found"));
    }
}
