//! Folio - build and publish a personal blog to a hosting branch.

#![allow(dead_code)]

mod builder;
mod cli;
mod config;
mod git;
mod logger;
mod plugin;
mod publish;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => cli::build::build_site(&config).map(|_| ()),
        Commands::Deploy { .. } => cli::deploy::deploy_site(&config),
        Commands::Check => cli::check::check_site(&config),
    }
}
