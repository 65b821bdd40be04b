//! `folio check` command implementation.

use clap::Args;
use folio_site::{Site, SiteError};

use super::{SiteArgs, report_diagnostics};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    site: SiteArgs,
}

impl CheckArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let site = self.site.load_site()?;
        report_diagnostics(output, site.diagnostics());

        let compile_errors = compile_all(&site, output)?;
        let problems = site.diagnostics().len() + compile_errors;
        if problems > 0 {
            return Err(CliError::Check(format!(
                "{problems} problems found ({} skipped files, {compile_errors} compile errors)",
                site.diagnostics().len()
            )));
        }

        output.success(&format!("{} documents OK", site.document_count()));
        Ok(())
    }
}

/// Compile every page, reporting failures. Returns the number of failures.
fn compile_all(site: &Site, output: &Output) -> Result<usize, CliError> {
    let mut failures = 0;
    for route in site.routes() {
        match site.compile(&route.section, &route.slug) {
            Ok(_) => {}
            Err(SiteError::Compile { path, source }) => {
                output.error(&format!("error: {path}: {source}"));
                failures += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(failures)
}
