//! The `render` command.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use nw_config::Config;
use nw_diagrams::{DiagramView, DiagramViewFactory, MountManager};
use nw_dom::{Dom, NodeId};
use nw_renderer::ViewerOptions;
use nw_routes::{Location, Router};
use tracing::debug;

use crate::error::CliError;
use crate::output::Output;

/// Render a markdown note to HTML on stdout.
#[derive(Args)]
pub struct RenderArgs {
    /// Markdown note file.
    file: PathBuf,

    /// Base path the client is served from (overrides config).
    #[arg(long)]
    base_path: Option<String>,

    /// Config file (default: discover notewell.toml upwards).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip first-H1 title extraction.
    #[arg(long)]
    no_title: bool,
}

/// Stand-in viewer used to exercise the mount pass from the CLI: the
/// wrapper gets a static placeholder instead of a live component.
struct PlaceholderViewFactory;

struct PlaceholderView;

impl DiagramView for PlaceholderView {}

impl DiagramViewFactory for PlaceholderViewFactory {
    fn mount(&self, dom: &mut Dom, wrapper: NodeId, _diagram_text: &str) -> Box<dyn DiagramView> {
        let placeholder = dom.create_element("svg");
        dom.add_class(placeholder, "diagram-placeholder");
        dom.append_child(wrapper, placeholder);
        Box::new(PlaceholderView)
    }
}

impl RenderArgs {
    pub fn execute(&self, output: &Output) -> Result<(), CliError> {
        let config = self.load_config()?;
        let markdown = std::fs::read_to_string(&self.file)?;

        let base_path = self
            .base_path
            .clone()
            .unwrap_or_else(|| config.viewer.base_path.clone());
        let router = Router::with_base(base_path);
        let location = note_location(&self.file)?;
        debug!(path = %location.path, "rendering note");

        let mut options = ViewerOptions::base(router, location);
        if config.viewer.title_extraction && !self.no_title {
            options = options.with_title_extraction();
        }
        let result = options.build().render_markdown(&markdown);

        if let Some(title) = &result.title {
            output.highlight(&format!("Title: {title}"));
        }
        for warning in &result.warnings {
            output.warning(warning);
        }

        if config.diagrams.enabled {
            report_diagrams(output, &result.html);
        }

        writeln!(std::io::stdout(), "{}", result.html)?;
        Ok(())
    }

    fn load_config(&self) -> Result<Config, CliError> {
        if let Some(path) = &self.config {
            return Ok(Config::load(path)?);
        }
        let start = self
            .file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Ok(Config::discover(start)?
            .map(|(config, _)| config)
            .unwrap_or_default())
    }
}

/// The note route location a file would be viewed at.
fn note_location(file: &Path) -> Result<Location, CliError> {
    let title = file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| CliError::Validation(format!("not a note file: {}", file.display())))?;
    Ok(Location {
        path: format!("/note/{title}"),
        query: Vec::new(),
        hash: None,
    })
}

/// Run the diagram mount pass over the committed fragment and report
/// how many views it would host.
fn report_diagrams(output: &Output, html: &str) {
    // Raw HTML in note content can make the fragment unparseable; the
    // mount pass then has nothing to operate on.
    let Ok(mut dom) = Dom::parse_fragment(html) else {
        debug!("fragment not well-formed, skipping diagram pass");
        return;
    };

    let mut manager = MountManager::new(PlaceholderViewFactory);
    let root = dom.root();
    manager.refresh(&mut dom, root);
    if manager.mounted_count() > 0 {
        output.info(&format!("{} diagram block(s)", manager.mounted_count()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_location_from_file() {
        let location = note_location(Path::new("notes/Weekly Plan.md")).unwrap();
        assert_eq!(location.path, "/note/Weekly Plan");
        assert_eq!(location.hash, None);
    }

    #[test]
    fn test_render_pipeline_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let note = dir.path().join("Demo.md");
        std::fs::write(&note, "# Demo\n\nsee [[Other]]\n").unwrap();

        let args = RenderArgs {
            file: note,
            base_path: Some("/notes".to_owned()),
            config: None,
            no_title: false,
        };
        // Exercises config discovery, routing and the full render.
        args.execute(&Output::new()).unwrap();
    }

    #[test]
    fn test_missing_file_errors() {
        let args = RenderArgs {
            file: PathBuf::from("/nonexistent/note.md"),
            base_path: None,
            config: None,
            no_title: false,
        };
        assert!(args.execute(&Output::new()).is_err());
    }
}
