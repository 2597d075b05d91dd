//! `[deploy]` section configuration.
//!
//! Contains the publish target: which remote repository and branch the
//! built output directory is synchronized to.
//!
//! # Example
//!
//! ```toml
//! [deploy]
//! provider = "github"         # Deployment provider (only github for now)
//! force = false               # Discard and re-clone the publish workspace
//! timeout = 120               # Network timeout in seconds (0 disables)
//!
//! [deploy.github]
//! url = "https://github.com/user/user.github.io.git"  # Repository URL
//! branch = "gh-pages"                                  # Target branch
//! token_path = "~/.github-token"                       # Optional: PAT file path
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default network timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Field paths for [`DeployConfig`] diagnostics.
pub struct DeployFields {
    pub provider: FieldPath,
    pub timeout: FieldPath,
}

/// Field paths for [`GithubDeployConfig`] diagnostics.
pub struct GithubDeployFields {
    pub url: FieldPath,
    pub branch: FieldPath,
    pub token_path: FieldPath,
}

/// Deploy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Deployment provider. Only "github" is supported.
    pub provider: String,

    /// Discard the cached publish workspace and re-clone (CLI `--force`).
    pub force: bool,

    /// Network timeout in seconds for clone/fetch/push. 0 disables.
    pub timeout: u64,

    /// GitHub Pages deployment settings.
    pub github: GithubDeployConfig,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            provider: "github".to_string(),
            force: false,
            timeout: DEFAULT_TIMEOUT_SECS,
            github: GithubDeployConfig::default(),
        }
    }
}

impl DeployConfig {
    pub const FIELDS: DeployFields = DeployFields {
        provider: FieldPath::new("deploy.provider"),
        timeout: FieldPath::new("deploy.timeout"),
    };

    /// Validate deploy configuration.
    ///
    /// # Checks
    /// - `provider` must be "github"
    /// - `github.url` is required and must look like a git remote
    /// - `github.branch` must be non-empty
    /// - If `github.token_path` is set, it must exist and be a file
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.provider != "github" {
            diag.error_with_hint(
                Self::FIELDS.provider,
                format!("unsupported provider `{}`", self.provider),
                "only \"github\" is supported",
            );
        }

        self.github.validate(diag);
    }
}

/// GitHub Pages deployment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubDeployConfig {
    /// Repository URL (HTTPS or SSH format).
    pub url: String,

    /// Target branch for deployment (e.g., "gh-pages", "master").
    pub branch: String,

    /// Path to file containing a GitHub personal access token.
    ///
    /// Store outside the repository (e.g., `~/.github-token`);
    /// never commit tokens to version control.
    pub token_path: Option<PathBuf>,
}

impl Default for GithubDeployConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            branch: "gh-pages".to_string(),
            token_path: None,
        }
    }
}

impl GithubDeployConfig {
    pub const FIELDS: GithubDeployFields = GithubDeployFields {
        url: FieldPath::new("deploy.github.url"),
        branch: FieldPath::new("deploy.github.branch"),
        token_path: FieldPath::new("deploy.github.token_path"),
    };

    fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.url.trim().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.url,
                "no repository URL configured",
                "set deploy.github.url, e.g.: \"https://github.com/user/user.github.io.git\"",
            );
        } else if !looks_like_remote(&self.url) {
            diag.error_with_hint(
                Self::FIELDS.url,
                format!("`{}` is not a recognized git remote", self.url),
                "use an https://, ssh (git@host:path) or filesystem path remote",
            );
        }

        if self.branch.trim().is_empty() {
            diag.error(Self::FIELDS.branch, "branch must not be empty");
        }

        if let Some(path) = &self.token_path {
            if !path.exists() {
                diag.error(
                    Self::FIELDS.token_path,
                    format!("token file not found: {}", path.display()),
                );
            } else if !path.is_file() {
                diag.error(
                    Self::FIELDS.token_path,
                    format!("token path is not a file: {}", path.display()),
                );
            }
        }
    }
}

/// Accept https/ssh remotes plus bare scp-like and filesystem paths.
fn looks_like_remote(url: &str) -> bool {
    if url.starts_with("https://") || url.starts_with("http://") || url.starts_with("ssh://") {
        return url::Url::parse(url).is_ok_and(|u| u.host_str().is_some());
    }
    // scp-like: git@github.com:user/repo.git
    if url.contains('@') && url.contains(':') {
        return true;
    }
    // local path remote (used heavily in tests)
    PathBuf::from(url).is_absolute() || url.starts_with("./") || url.starts_with("../")
}
