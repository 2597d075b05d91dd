//! Publish error taxonomy.
//!
//! Publishing fails fast: there is no internal retry loop. Instead each
//! failure is classified so the caller can decide whether re-invoking may
//! succeed (`is_retryable`).

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the synchronize-and-push operation.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The output directory is missing. Raised before any remote
    /// interaction is attempted.
    #[error("output directory `{0}` does not exist (run `folio build` first)")]
    MissingSource(PathBuf),

    /// The remote rejected our credentials.
    #[error("authentication rejected by `{remote}`\n{detail}")]
    Auth { remote: String, detail: String },

    /// The remote branch head moved concurrently (non-fast-forward push).
    #[error("remote branch `{branch}` changed during publish (non-fast-forward)\n{detail}")]
    Conflict { branch: String, detail: String },

    /// A network operation exceeded the configured deadline.
    #[error("network operation timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Network-level failure reaching the remote.
    #[error("network failure talking to `{remote}`\n{detail}")]
    Network { remote: String, detail: String },

    /// Local filesystem failure while mirroring or committing.
    #[error("publish io failure")]
    Io(#[from] std::io::Error),

    /// Git plumbing failure (repository corrupt, unexpected transport
    /// output, ...). Not retryable.
    #[error("git error: {0}")]
    Git(String),
}

impl PublishError {
    /// Whether re-invoking the publish may succeed without any local change.
    ///
    /// Conflicts want a re-fetch (which re-running performs), timeouts and
    /// network/io hiccups are transient; everything else needs operator
    /// attention first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Conflict { .. } | Self::Timeout { .. } | Self::Network { .. } | Self::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(
            PublishError::Conflict {
                branch: "gh-pages".into(),
                detail: String::new()
            }
            .is_retryable()
        );
        assert!(PublishError::Timeout { secs: 120 }.is_retryable());
        assert!(
            !PublishError::Auth {
                remote: "origin".into(),
                detail: String::new()
            }
            .is_retryable()
        );
        assert!(!PublishError::MissingSource(PathBuf::from("public")).is_retryable());
        assert!(!PublishError::Git("broken".into()).is_retryable());
    }
}
