//! Site manifest generation.
//!
//! The manifest is the data contract between folio and the external
//! builder: site metadata plus the resolved, ordered plugin list,
//! serialized as JSON into the cache directory.

use crate::config::SiteConfig;
use crate::plugin::ResolvedPlugin;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Manifest file name inside the cache directory.
const MANIFEST_FILE: &str = "site.json";

#[derive(Serialize)]
struct SiteManifest<'a> {
    site: &'a crate::config::SiteInfoConfig,
    plugins: &'a [ResolvedPlugin],
}

/// Write the site manifest for the current configuration.
///
/// Returns the manifest path, handed to the builder as `FOLIO_MANIFEST`.
pub fn write_manifest(config: &SiteConfig) -> Result<PathBuf> {
    let manifest = SiteManifest {
        site: &config.site,
        plugins: config.resolved_plugins(),
    };

    let cache_dir = config.cache_dir();
    fs::create_dir_all(&cache_dir)
        .with_context(|| format!("failed to create {}", cache_dir.display()))?;

    let path = cache_dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(&manifest).context("failed to serialize manifest")?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Commands;
    use crate::config::test_parse_config;

    #[test]
    fn test_manifest_contains_site_and_plugins() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_parse_config(
            r#"plugins = [
    { resolve = "source-filesystem", options = { path = "content/blog", name = "blog" } },
    "feed",
]

[site]
title = "Tech Bites"
author = "Alice"
description = "A personal blog"

[build]
command = ["true"]

[deploy.github]
url = "/srv/git/site.git"
"#,
        );
        config.root = dir.path().to_path_buf();
        config.validate(&Commands::Check).unwrap();

        let path = write_manifest(&config).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(json["site"]["title"], "Tech Bites");
        let plugins = json["plugins"].as_array().unwrap();
        assert_eq!(plugins.len(), 2);
        assert_eq!(plugins[0]["resolve"], "source-filesystem");
        assert_eq!(plugins[0]["kind"], "source");
        assert_eq!(plugins[0]["options"]["name"], "blog");
        assert_eq!(plugins[1]["resolve"], "feed");
    }
}
