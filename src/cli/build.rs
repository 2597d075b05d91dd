//! Build command: run the external builder and report the output.

use crate::builder::{self, BuildOutput};
use crate::config::SiteConfig;
use crate::log;
use crate::utils::plural_count;
use anyhow::Result;
use jwalk::WalkDir;

/// Build the site via the configured builder command.
pub fn build_site(config: &SiteConfig) -> Result<BuildOutput> {
    log!(
        "build";
        "building `{}` with {}",
        config.site.title,
        plural_count(config.resolved_plugins().len(), "plugin")
    );

    let output = builder::run_builder(config)?;

    let files = count_files(&output);
    log!(
        "build";
        "finished: {} in {}",
        plural_count(files, "file"),
        config.build.output.display()
    );

    Ok(output)
}

fn count_files(output: &BuildOutput) -> usize {
    WalkDir::new(&output.dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .count()
}
