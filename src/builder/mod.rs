//! Builder boundary.
//!
//! The builder is an external collaborator: any command that consumes the
//! content tree plus the site manifest and produces the static output
//! directory. folio's responsibility ends at invoking it with the right
//! environment and checking that output was produced.
//!
//! Environment handed to the builder command:
//!
//! | Variable            | Value                                  |
//! |---------------------|----------------------------------------|
//! | `FOLIO_ROOT`        | project root                           |
//! | `FOLIO_CONTENT_DIR` | content tree                           |
//! | `FOLIO_OUTPUT_DIR`  | directory the builder must populate    |
//! | `FOLIO_MANIFEST`    | path of the generated site manifest    |
//!
//! `$FOLIO_*` occurrences in the command arguments are substituted with the
//! same values.

mod manifest;

pub use manifest::write_manifest;

use crate::config::SiteConfig;
use crate::utils::exec::Cmd;
use crate::{debug, log};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Build failures, distinguishable from configuration and publish failures.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("content directory `{0}` does not exist")]
    MissingContent(PathBuf),

    #[error("failed to write site manifest")]
    Manifest(#[source] anyhow::Error),

    #[error("builder command failed")]
    Command(#[source] anyhow::Error),

    #[error("builder produced no output directory at `{0}`")]
    MissingOutput(PathBuf),
}

/// The build output directory, verified to exist.
#[derive(Debug)]
pub struct BuildOutput {
    pub dir: PathBuf,
}

/// Run the configured builder command.
///
/// Writes the site manifest first, then executes `[build] command` with the
/// `FOLIO_*` environment. Fails if the builder exits non-zero or leaves no
/// output directory behind.
pub fn run_builder(config: &SiteConfig) -> Result<BuildOutput, BuildError> {
    if !config.build.content.is_dir() {
        return Err(BuildError::MissingContent(config.build.content.clone()));
    }

    if config.build.clean && config.build.output.exists() {
        debug!("build"; "cleaning {}", config.build.output.display());
        fs::remove_dir_all(&config.build.output)
            .map_err(|e| BuildError::Command(anyhow::Error::new(e)))?;
    }

    let manifest_path = write_manifest(config).map_err(BuildError::Manifest)?;

    let vars = build_folio_vars(config, &manifest_path);
    let resolved = resolve_args(&config.build.command, &vars);

    log!("build"; "`{}` running", resolved.first().map(String::as_str).unwrap_or("builder"));

    let output = Cmd::from_slice(&resolved)
        .cwd(config.get_root())
        .envs(&vars)
        .run()
        .map_err(BuildError::Command)?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        println!("{stdout}");
    }

    if !config.build.output.is_dir() {
        return Err(BuildError::MissingOutput(config.build.output.clone()));
    }

    Ok(BuildOutput {
        dir: config.build.output.clone(),
    })
}

/// Build `$FOLIO_*` environment variables for the builder command.
pub fn build_folio_vars(
    config: &SiteConfig,
    manifest_path: &std::path::Path,
) -> FxHashMap<String, String> {
    let mut vars = FxHashMap::default();

    vars.insert("FOLIO_ROOT".into(), config.get_root().display().to_string());
    vars.insert(
        "FOLIO_CONTENT_DIR".into(),
        config.build.content.display().to_string(),
    );
    vars.insert(
        "FOLIO_OUTPUT_DIR".into(),
        config.build.output.display().to_string(),
    );
    vars.insert("FOLIO_MANIFEST".into(), manifest_path.display().to_string());

    vars
}

/// Resolve `$FOLIO_*` variables in command arguments
///
/// Replaces occurrences of `$FOLIO_XXX` with actual values from the vars map
pub fn resolve_args(args: &[String], vars: &FxHashMap<String, String>) -> Vec<String> {
    args.iter()
        .map(|arg| {
            let mut result = arg.clone();
            for (key, value) in vars {
                let pattern = format!("${}", key);
                result = result.replace(&pattern, value);
            }
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::path::Path;

    fn test_config(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.root = root.to_path_buf();
        config.build.content = root.join("content");
        config.build.output = root.join("public");
        config
    }

    #[test]
    fn test_resolve_args_substitution() {
        let mut vars = FxHashMap::default();
        vars.insert("FOLIO_OUTPUT_DIR".to_string(), "/tmp/public".to_string());

        let args = vec!["build".to_string(), "--out=$FOLIO_OUTPUT_DIR".to_string()];
        let resolved = resolve_args(&args, &vars);

        assert_eq!(resolved, ["build", "--out=/tmp/public"]);
    }

    #[test]
    fn test_missing_content_fails_before_running() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.build.command = vec!["true".to_string()];

        let err = run_builder(&config).unwrap_err();
        assert!(matches!(err, BuildError::MissingContent(_)));
    }

    #[test]
    fn test_builder_must_produce_output() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("content")).unwrap();
        let mut config = test_config(dir.path());
        // A builder that succeeds but writes nothing
        config.build.command = vec!["true".to_string()];

        let err = run_builder(&config).unwrap_err();
        assert!(matches!(err, BuildError::MissingOutput(_)));
    }

    #[test]
    fn test_builder_runs_with_env() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("content")).unwrap();
        let mut config = test_config(dir.path());
        // Use the environment to create the output dir, proving FOLIO_* is set
        config.build.command = vec![
            "sh".to_string(),
            "-c".to_string(),
            "mkdir -p \"$FOLIO_OUTPUT_DIR\"".to_string(),
        ];

        let output = run_builder(&config).unwrap();
        assert!(output.dir.is_dir());
    }

    #[test]
    fn test_failing_builder_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("content")).unwrap();
        let mut config = test_config(dir.path());
        config.build.command = vec!["false".to_string()];

        let err = run_builder(&config).unwrap_err();
        assert!(matches!(err, BuildError::Command(_)));
    }
}
