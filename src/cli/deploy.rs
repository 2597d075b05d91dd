//! Deploy command: build, then synchronize the output to the hosting branch.

use crate::config::SiteConfig;
use crate::logger::StatusLine;
use crate::publish::{self, PublishOptions, PublishOutcome, PublishTarget};
use crate::{debug, log};
use anyhow::{Context, Result, anyhow};
use std::fs;
use std::time::Duration;

/// Build the site and publish the output directory.
pub fn deploy_site(config: &SiteConfig) -> Result<()> {
    super::build::build_site(config)?;

    let target = PublishTarget {
        local_dir: config.build.output.clone(),
        remote_url: config.deploy.github.url.clone(),
        branch: config.deploy.github.branch.clone(),
    };
    let opts = PublishOptions {
        force: config.deploy.force,
        timeout: match config.deploy.timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        },
        token: read_token(config)?,
    };

    log!(
        "deploy";
        "publishing {} -> {} ({})",
        config.build.output.display(),
        target.remote_url,
        target.branch
    );

    let mut status = StatusLine::new();
    status.step("synchronizing remote branch");

    match publish::publish(&config.cache_dir(), &target, &opts) {
        Ok(PublishOutcome::Published { commit, stats }) => {
            // The one completion signal, emitted only after the push landed
            status.success(&format!(
                "deploy complete: {} ({})",
                stats,
                short_id(&commit)
            ));
            Ok(())
        }
        Ok(PublishOutcome::Unchanged) => {
            status.success("deploy complete: branch already up to date");
            Ok(())
        }
        Err(err) => {
            status.error("deploy failed", &err.to_string());
            if err.is_retryable() {
                debug!("deploy"; "failure is transient, re-running may succeed");
                Err(anyhow!("deploy failed (retryable): {err}"))
            } else {
                Err(anyhow!("deploy failed: {err}"))
            }
        }
    }
}

/// Read the access token file, if one is configured.
fn read_token(config: &SiteConfig) -> Result<Option<String>> {
    let Some(path) = &config.deploy.github.token_path else {
        return Ok(None);
    };
    let token = fs::read_to_string(path)
        .with_context(|| format!("failed to read token file {}", path.display()))?;
    Ok(Some(token.trim().to_string()))
}

fn short_id(id: &gix::ObjectId) -> String {
    id.to_hex_with_len(7).to_string()
}
