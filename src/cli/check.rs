//! Check command: report what a validated configuration resolves to.
//!
//! Validation itself happens during config load; reaching this point means
//! the configuration is sound, so the command just summarizes it.

use crate::config::SiteConfig;
use crate::log;
use crate::utils::plural_count;
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn check_site(config: &SiteConfig) -> Result<()> {
    log!("check"; "configuration ok: {}", config.config_path.display());

    log!(
        "check";
        "site: {} by {}",
        config.site.title.bold(),
        config.site.author
    );
    if let Some(url) = &config.site.url {
        log!("check"; "url: {url}");
    }

    let plugins = config.resolved_plugins();
    log!("check"; "{} resolved:", plural_count(plugins.len(), "plugin"));
    for plugin in plugins {
        println!(
            "- {} ({:?}{})",
            plugin.resolve,
            plugin.kind,
            if plugin.options.is_empty() {
                String::new()
            } else {
                format!(", {}", plural_count(plugin.options.len(), "option"))
            }
        );
    }

    log!(
        "check";
        "deploy target: {} ({})",
        config.deploy.github.url,
        config.deploy.github.branch
    );

    Ok(())
}
