//! The `annotate` command.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use nw_annotate::Annotator;
use nw_config::Config;
use nw_routes::Router;

use crate::error::CliError;
use crate::output::Output;

/// Print the annotation stream a note's raw text produces.
#[derive(Args)]
pub struct AnnotateArgs {
    /// Markdown note file.
    file: PathBuf,

    /// Base path the client is served from (overrides config).
    #[arg(long)]
    base_path: Option<String>,

    /// Emit the stream as JSON.
    #[arg(long)]
    json: bool,
}

impl AnnotateArgs {
    pub fn execute(&self, output: &Output) -> Result<(), CliError> {
        let source = std::fs::read_to_string(&self.file)?;

        let base_path = match &self.base_path {
            Some(base) => base.clone(),
            None => {
                let start = self.file.parent().unwrap_or_else(|| ".".as_ref());
                Config::discover(start)?
                    .map(|(config, _)| config.viewer.base_path)
                    .unwrap_or_default()
            }
        };

        let annotator = Annotator::with_router(Router::with_base(base_path));
        let spans = annotator.annotate(&source);

        let mut stdout = std::io::stdout();
        if self.json {
            writeln!(stdout, "{}", serde_json::to_string_pretty(&spans)?)?;
        } else {
            if spans.is_empty() {
                output.info("no references found");
                return Ok(());
            }
            for span in &spans {
                writeln!(
                    stdout,
                    "{}..{}\t{}\t{}",
                    span.range.0, span.range.1, span.text, span.url
                )?;
            }
        }

        Ok(())
    }
}
