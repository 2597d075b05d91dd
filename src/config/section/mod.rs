//! Configuration section definitions.
//!
//! Each module corresponds to a section in `folio.toml`:
//!
//! | Module     | TOML Section   | Purpose                           |
//! |------------|----------------|-----------------------------------|
//! | `site`     | `[site]`       | Site metadata                     |
//! | `build`    | `[build]`      | Content/output paths, builder cmd |
//! | `deploy`   | `[deploy]`     | Publish target                    |

mod build;
mod deploy;
mod site;

// Re-export section configs
pub use build::BuildSectionConfig;
pub use deploy::{DeployConfig, GithubDeployConfig};
pub use site::{SiteInfoConfig, SocialConfig};
