//! `folio build` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use folio_config::CliSettings;
use folio_site::{CompileError, Route, Site};

use super::{SiteArgs, build_site, report_diagnostics};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Output directory (default: .folio/build/).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

/// Pages written by a build, and those rendered as error panels.
#[derive(Debug, Default)]
struct BuildSummary {
    pages: usize,
    failed: Vec<(Route, CompileError)>,
}

impl BuildArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.site.load_config(CliSettings {
            output_dir: self.output_dir.clone(),
            ..CliSettings::default()
        })?;
        let output_dir = &config.build_resolved.output_dir;

        output.info(&format!(
            "Source: {}",
            config.content_resolved.source_dir.display()
        ));
        output.info(&format!("Output: {}", output_dir.display()));

        let site = build_site(&config)?;
        report_diagnostics(output, site.diagnostics());

        let summary = write_site(&site, output_dir)?;
        for (route, error) in &summary.failed {
            output.warning(&format!("warning: {}: {error}", route.path()));
        }

        output.success(&format!(
            "Built {} pages to {} ({} skipped files, {} compile errors)",
            summary.pages,
            output_dir.display(),
            site.diagnostics().len(),
            summary.failed.len()
        ));
        Ok(())
    }
}

/// Write one HTML fragment per route plus `navigation.json` and `routes.json`.
fn write_site(site: &Site, output_dir: &Path) -> Result<BuildSummary, CliError> {
    fs::create_dir_all(output_dir)?;
    let mut summary = BuildSummary::default();

    let routes = site.routes();
    for route in &routes {
        let page = site.render(&route.section, &route.slug)?;
        let page_dir = output_dir.join(&route.section).join(&route.slug);
        fs::create_dir_all(&page_dir)?;
        fs::write(page_dir.join("index.html"), &page.html)?;
        summary.pages += 1;
        if let Some(error) = page.error {
            summary.failed.push((route.clone(), error));
        }
    }

    fs::write(
        output_dir.join("navigation.json"),
        serde_json::to_string_pretty(&site.navigation())?,
    )?;
    fs::write(
        output_dir.join("routes.json"),
        serde_json::to_string_pretty(&routes)?,
    )?;

    tracing::info!(
        pages = summary.pages,
        failed = summary.failed.len(),
        output = %output_dir.display(),
        "Static build written"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use folio_site::SiteConfig;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::commands::test_support::write_content;

    #[test]
    fn test_write_site() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        write_content(&content);
        let site = Site::build(content, &SiteConfig::default()).unwrap();
        let out = dir.path().join("out");

        let summary = write_site(&site, &out).unwrap();

        assert_eq!(summary.pages, 3);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0.path(), "/guides/react/bad");

        let overview = fs::read_to_string(out.join("intro/overview/index.html")).unwrap();
        assert!(overview.contains(r#"<h1 id="overview">Overview</h1>"#));
        let bad = fs::read_to_string(out.join("guides/react/bad/index.html")).unwrap();
        assert!(bad.contains("compile-error"));

        let routes: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("routes.json")).unwrap()).unwrap();
        assert_eq!(
            routes,
            serde_json::json!([
                {"section": "guides/react", "slug": "bad"},
                {"section": "guides/react", "slug": "hooks"},
                {"section": "intro", "slug": "overview"},
            ])
        );
        assert!(out.join("navigation.json").is_file());
    }

    #[test]
    fn test_execute_with_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        write_content(&content);
        let out = dir.path().join("dist");

        let args = BuildArgs {
            site: SiteArgs {
                source_dir: Some(content),
                include_unpublished: false,
                config: None,
            },
            output_dir: Some(out.clone()),
        };
        args.execute(&Output::new()).unwrap();

        assert!(out.join("guides/react/hooks/index.html").is_file());
    }
}
