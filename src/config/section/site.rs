//! `[site]` section configuration.
//!
//! Contains the site metadata handed to the builder and embedded in the
//! generated site manifest.
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "Tech Bites"
//! author = "Alice"
//! description = "A personal blog"
//! url = "https://alice.github.io/"
//!
//! [site.social]
//! twitter = "alice"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Field paths for [`SiteInfoConfig`] diagnostics.
pub struct SiteInfoFields {
    pub title: FieldPath,
    pub author: FieldPath,
    pub description: FieldPath,
    pub url: FieldPath,
}

/// Site metadata: title, author, description, canonical URL, social handles.
///
/// Read once at startup and passed by reference through the build and
/// publish call chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfoConfig {
    /// Site title.
    pub title: String,

    /// Author name.
    pub author: String,

    /// Site description.
    pub description: String,

    /// Canonical site URL (e.g., "https://alice.github.io/").
    pub url: Option<String>,

    /// Social handles.
    pub social: SocialConfig,
}

/// `[site.social]` handles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    /// Twitter handle, without the leading `@`.
    pub twitter: String,
}

impl SiteInfoConfig {
    pub const FIELDS: SiteInfoFields = SiteInfoFields {
        title: FieldPath::new("site.title"),
        author: FieldPath::new("site.author"),
        description: FieldPath::new("site.description"),
        url: FieldPath::new("site.url"),
    };

    /// Validate site metadata.
    ///
    /// # Checks
    /// - `title`, `author` and `description` are required
    /// - `url`, when set, must be a valid http(s) URL with a host
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.title.trim().is_empty() {
            diag.error(Self::FIELDS.title, "required field is missing or empty");
        }
        if self.author.trim().is_empty() {
            diag.error(Self::FIELDS.author, "required field is missing or empty");
        }
        if self.description.trim().is_empty() {
            diag.error(Self::FIELDS.description, "required field is missing or empty");
        }

        if let Some(url_str) = &self.url {
            match url::Url::parse(url_str) {
                Ok(parsed) => {
                    if !matches!(parsed.scheme(), "http" | "https") {
                        diag.error_with_hint(
                            Self::FIELDS.url,
                            format!(
                                "scheme '{}' not supported, must be http or https",
                                parsed.scheme()
                            ),
                            "use format like https://example.com",
                        );
                    }
                    if parsed.host_str().is_none() {
                        diag.error_with_hint(
                            Self::FIELDS.url,
                            "URL must have a valid host",
                            "use format like https://example.com",
                        );
                    }
                }
                Err(e) => {
                    diag.error_with_hint(
                        Self::FIELDS.url,
                        format!("invalid URL: {}", e),
                        "use format like https://example.com",
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_site_config() {
        let config = test_parse_config(
            r#"[site]
title = "Tech Bites"
author = "Alice"
description = "A personal blog"
url = "https://alice.github.io/"

[site.social]
twitter = "alice""#,
        );

        assert_eq!(config.site.title, "Tech Bites");
        assert_eq!(config.site.author, "Alice");
        assert_eq!(config.site.url.as_deref(), Some("https://alice.github.io/"));
        assert_eq!(config.site.social.twitter, "alice");
    }

    #[test]
    fn test_site_missing_title_rejected() {
        let config = test_parse_config("[site]\nauthor = \"Alice\"\ndescription = \"x\"");
        let mut diag = crate::config::ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert!(diag.has_errors());
        assert!(diag.errors().iter().any(|e| e.field == "site.title"));
    }

    #[test]
    fn test_site_url_scheme_rejected() {
        let config = test_parse_config_site("ftp://example.com");
        let mut diag = crate::config::ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert!(diag.errors().iter().any(|e| e.field == "site.url"));
    }

    #[test]
    fn test_site_url_valid() {
        let config = test_parse_config_site("https://example.com/blog");
        let mut diag = crate::config::ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert!(diag.is_empty());
    }

    fn test_parse_config_site(url: &str) -> crate::config::SiteConfig {
        test_parse_config(&format!(
            "[site]\ntitle = \"T\"\nauthor = \"A\"\ndescription = \"D\"\nurl = \"{url}\""
        ))
    }
}
