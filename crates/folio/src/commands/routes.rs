//! `folio routes` command implementation.

use clap::Args;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Print routes as JSON.
    #[arg(long)]
    json: bool,
}

impl RoutesArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let site = self.site.load_site()?;
        let routes = site.routes();

        if self.json {
            output.result(&serde_json::to_string_pretty(&routes)?);
        } else {
            for route in &routes {
                output.result(&route.path());
            }
            output.info(&format!("{} routes", routes.len()));
        }
        Ok(())
    }
}
