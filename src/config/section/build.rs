//! `[build]` section configuration.
//!
//! Paths and the external builder command. The builder itself is an opaque
//! collaborator: any command that turns the content tree into a static
//! output directory.
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "content"           # Content tree consumed by the builder
//! output = "public"             # Static output directory
//! command = ["npx", "blog-builder", "--out", "$FOLIO_OUTPUT_DIR"]
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Field paths for [`BuildSectionConfig`] diagnostics.
pub struct BuildSectionFields {
    pub content: FieldPath,
    pub output: FieldPath,
    pub command: FieldPath,
}

/// Build settings: content/output directories and the builder command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Content directory (relative to project root).
    pub content: PathBuf,

    /// Output directory produced by the builder (relative to project root).
    pub output: PathBuf,

    /// External builder command and arguments.
    ///
    /// Supports `$FOLIO_*` variable substitution; see the builder module.
    pub command: Vec<String>,

    /// Remove the output directory before building (CLI `--clean`).
    #[serde(skip)]
    pub clean: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            output: PathBuf::from("public"),
            command: Vec::new(),
            clean: false,
        }
    }
}

impl BuildSectionConfig {
    pub const FIELDS: BuildSectionFields = BuildSectionFields {
        content: FieldPath::new("build.content"),
        output: FieldPath::new("build.output"),
        command: FieldPath::new("build.command"),
    };

    /// Validate build configuration for commands that run the builder.
    ///
    /// # Checks
    /// - `command` must be configured (the builder is external)
    pub fn validate_for_build(&self, diag: &mut ConfigDiagnostics) {
        if self.command.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.command,
                "no builder command configured",
                "set [build] command, e.g.: command = [\"npx\", \"blog-builder\"]",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use std::path::PathBuf;

    #[test]
    fn test_build_config() {
        let config = test_parse_config(
            r#"[build]
content = "posts"
output = "dist"
command = ["npx", "blog-builder"]"#,
        );

        assert_eq!(config.build.content, PathBuf::from("posts"));
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.build.command, vec!["npx", "blog-builder"]);
    }

    #[test]
    fn test_build_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.build.content, PathBuf::from("content"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert!(config.build.command.is_empty());
        assert!(!config.build.clean);
    }

    #[test]
    fn test_missing_command_rejected_for_build() {
        let config = test_parse_config("");
        let mut diag = crate::config::ConfigDiagnostics::new();
        config.build.validate_for_build(&mut diag);
        assert!(diag.errors().iter().any(|e| e.field == "build.command"));
    }
}
