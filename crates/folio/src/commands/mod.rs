//! CLI command implementations.

mod build;
mod check;
mod routes;
mod search;

use std::path::PathBuf;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_site::{Diagnostic, Site, SiteConfig, TreeConfig};

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use routes::RoutesArgs;
pub(crate) use search::SearchArgs;

use crate::error::CliError;
use crate::output::Output;

/// Options shared by every command that loads the site.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Include documents marked `published: false`.
    #[arg(long)]
    include_unpublished: bool,

    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SiteArgs {
    /// Load configuration, applying `extra` CLI overrides on top of these args.
    pub(crate) fn load_config(&self, extra: CliSettings) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            include_unpublished: self.include_unpublished.then_some(true),
            ..extra
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Load configuration and build the site.
    pub(crate) fn load_site(&self) -> Result<Site, CliError> {
        let config = self.load_config(CliSettings::default())?;
        build_site(&config)
    }
}

/// Build a site snapshot from resolved configuration.
pub(crate) fn build_site(config: &Config) -> Result<Site, CliError> {
    let site_config = site_config(config);
    Ok(Site::build(
        config.content_resolved.source_dir.clone(),
        &site_config,
    )?)
}

fn site_config(config: &Config) -> SiteConfig {
    SiteConfig {
        tree: TreeConfig {
            meta_filename: config.content_resolved.meta_filename.clone(),
            keep_empty_sections: config.content_resolved.keep_empty_sections,
        },
        include_unpublished: config.site.include_unpublished,
        max_results: config.search.max_results,
    }
}

/// Print every diagnostic as a warning.
pub(crate) fn report_diagnostics(output: &Output, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        output.warning(&format!("warning: {diagnostic}"));
    }
}
