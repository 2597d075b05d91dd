//! Declarative plugin entries.
//!
//! A plugin is declared in `folio.toml` either as a bare identifier or as an
//! identifier with an options table:
//!
//! ```toml
//! plugins = [
//!     "typography",
//!     { resolve = "source-filesystem", options = { path = "content/blog", name = "blog" } },
//! ]
//! ```

use serde::{Deserialize, Serialize};

/// Options attached to a plugin entry.
///
/// Kept opaque: folio forwards them to the builder verbatim, checking only
/// the keys the registry declares as required. `toml::Table` keeps values
/// deterministic (sorted) for the generated manifest.
pub type PluginOptions = toml::Table;

/// One entry of the ordered plugin list.
///
/// Declaration order is preserved end-to-end; it determines plugin
/// registration order during the build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginDescriptor {
    /// Bare identifier: `"typography"`.
    Named(String),
    /// Identifier with options: `{ resolve = "...", options = { ... } }`.
    Configured {
        resolve: String,
        #[serde(default)]
        options: PluginOptions,
    },
}

impl PluginDescriptor {
    /// The plugin identifier this entry resolves to.
    pub fn id(&self) -> &str {
        match self {
            Self::Named(id) => id,
            Self::Configured { resolve, .. } => resolve,
        }
    }

    /// The declared options, if any.
    pub fn options(&self) -> Option<&PluginOptions> {
        match self {
            Self::Named(_) => None,
            Self::Configured { options, .. } => Some(options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize)]
    struct Doc {
        plugins: Vec<PluginDescriptor>,
    }

    #[test]
    fn test_mixed_descriptor_forms() {
        let doc: Doc = toml::from_str(
            r#"plugins = [
    "feed",
    { resolve = "comments", options = { shortname = "my-blog" } },
]"#,
        )
        .unwrap();

        assert_eq!(doc.plugins.len(), 2);
        assert_eq!(doc.plugins[0], PluginDescriptor::Named("feed".into()));
        assert_eq!(doc.plugins[1].id(), "comments");
        let options = doc.plugins[1].options().unwrap();
        assert_eq!(
            options.get("shortname").and_then(|v| v.as_str()),
            Some("my-blog")
        );
    }

    #[test]
    fn test_configured_without_options() {
        let doc: Doc = toml::from_str(r#"plugins = [{ resolve = "feed" }]"#).unwrap();
        assert_eq!(doc.plugins[0].id(), "feed");
        assert!(doc.plugins[0].options().unwrap().is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let doc: Doc =
            toml::from_str(r#"plugins = ["typography", "feed", "offline"]"#).unwrap();
        let ids: Vec<_> = doc.plugins.iter().map(|p| p.id().to_string()).collect();
        assert_eq!(ids, ["typography", "feed", "offline"]);
    }
}
