//! `folio search` command implementation.

use clap::Args;
use clap::builder::RangedU64ValueParser;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the search command.
#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Text to look for (case-insensitive substring).
    query: String,

    /// Maximum number of hits (overrides `search.max_results`).
    #[arg(short = 'n', long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    limit: Option<usize>,

    /// Print hits as JSON.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    site: SiteArgs,
}

impl SearchArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let site = self.site.load_site()?;
        let hits = match self.limit {
            Some(limit) => site.search_with_limit(&self.query, Some(limit)),
            None => site.search(&self.query),
        };

        if self.json {
            output.result(&serde_json::to_string_pretty(&hits)?);
            return Ok(());
        }

        for hit in &hits {
            output.result_pair(&hit.path(), &hit.title);
            if let Some(description) = &hit.description {
                output.result(&format!("    {description}"));
            }
        }
        output.info(&format!("{} results for \"{}\"", hits.len(), self.query));
        Ok(())
    }
}
