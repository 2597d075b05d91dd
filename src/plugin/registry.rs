//! Plugin registry and eager resolution.
//!
//! The registry maps plugin identifiers to their specification: what kind of
//! build-time behavior they contribute and which options they require.
//! Resolution runs at configuration-load time so a typo'd identifier fails
//! before any build output exists.

use super::descriptor::{PluginDescriptor, PluginOptions};
use crate::config::ConfigDiagnostics;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::LazyLock;

/// What a plugin contributes to the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    /// Feeds content into the build (filesystem trees).
    Source,
    /// Transforms sourced content (markdown, images, highlighting).
    Transform,
    /// Adds site-level integrations (feed, manifest, analytics, comments).
    Integration,
}

/// Registry entry for one plugin identifier.
pub struct PluginSpec {
    pub kind: PluginKind,
    /// Option keys that must be present when the plugin is declared.
    pub required: &'static [&'static str],
    pub summary: &'static str,
}

/// Known plugins, keyed by identifier.
static REGISTRY: LazyLock<FxHashMap<&'static str, PluginSpec>> = LazyLock::new(|| {
    let mut map = FxHashMap::default();
    let mut add = |id, kind, required, summary| {
        map.insert(id, PluginSpec {
            kind,
            required,
            summary,
        });
    };

    add(
        "source-filesystem",
        PluginKind::Source,
        &["path", "name"][..],
        "sources content from a directory tree",
    );
    add(
        "transform-markdown",
        PluginKind::Transform,
        &[],
        "renders markdown content to pages",
    );
    add(
        "responsive-images",
        PluginKind::Transform,
        &[],
        "generates responsive image variants",
    );
    add(
        "syntax-highlight",
        PluginKind::Transform,
        &[],
        "highlights fenced code blocks",
    );
    add(
        "feed",
        PluginKind::Integration,
        &[],
        "generates an RSS feed",
    );
    add(
        "manifest",
        PluginKind::Integration,
        &["name", "short_name", "start_url", "icon"],
        "generates the web app manifest",
    );
    add(
        "offline",
        PluginKind::Integration,
        &[],
        "adds offline support via a service worker",
    );
    add(
        "google-analytics",
        PluginKind::Integration,
        &["tracking_id"],
        "embeds analytics tracking",
    );
    add(
        "typography",
        PluginKind::Integration,
        &[],
        "applies the typography theme",
    );
    add(
        "comments",
        PluginKind::Integration,
        &["shortname"],
        "embeds the comment widget",
    );

    map
});

/// A plugin entry resolved against the registry.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPlugin {
    pub resolve: String,
    pub kind: PluginKind,
    pub options: PluginOptions,
}

/// Look up a single identifier.
pub fn lookup(id: &str) -> Option<&'static PluginSpec> {
    REGISTRY.get(id)
}

/// Identifiers known to the registry, sorted (for hints).
pub fn known_ids() -> Vec<&'static str> {
    let mut ids: Vec<_> = REGISTRY.keys().copied().collect();
    ids.sort_unstable();
    ids
}

/// Resolve the declared plugin list against the registry, in order.
///
/// Every failure (unknown identifier, missing required option) lands in
/// `diag` with the exact `plugins[i]` field path; the returned list contains
/// only the entries that resolved.
pub fn resolve_plugins(
    descriptors: &[PluginDescriptor],
    diag: &mut ConfigDiagnostics,
) -> Vec<ResolvedPlugin> {
    let mut resolved = Vec::with_capacity(descriptors.len());

    for (i, descriptor) in descriptors.iter().enumerate() {
        let id = descriptor.id();
        let Some(spec) = lookup(id) else {
            diag.error_with_hint(
                format!("plugins[{i}]"),
                format!("unknown plugin `{id}`"),
                format!("known plugins: {}", known_ids().join(", ")),
            );
            continue;
        };

        let options = descriptor.options().cloned().unwrap_or_default();
        let mut complete = true;
        for key in spec.required {
            if !options.contains_key(*key) {
                diag.error(
                    format!("plugins[{i}].options.{key}"),
                    format!("`{id}` requires option `{key}`"),
                );
                complete = false;
            }
        }
        if !complete {
            continue;
        }

        resolved.push(ResolvedPlugin {
            resolve: id.to_string(),
            kind: spec.kind,
            options,
        });
    }

    resolved
}
