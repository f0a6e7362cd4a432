//! Viewer configuration composition.

use nw_annotate::{AnnotationStream, Annotator};
use nw_routes::{Location, Router};

use crate::customize::{NoteCustomizer, RenderContext, RenderCustomizer};
use crate::plugin::{CodeBlockPlugin, HighlightPlugin};
use crate::renderer::NoteRenderer;

/// Configuration for one render pass of the viewer.
///
/// Pure composition: collects the plugin list, the render customizer and
/// the autolink function, and [`build`](Self::build)s the configured
/// renderer. [`base`](Self::base) assembles the note client's standard
/// set; the builder methods exist for hosts that need a different mix.
#[derive(Default)]
pub struct ViewerOptions {
    plugins: Vec<Box<dyn CodeBlockPlugin>>,
    customizer: Option<Box<dyn RenderCustomizer>>,
    autolinks: Option<Box<dyn Fn(&str) -> AnnotationStream>>,
    extract_title: bool,
}

impl ViewerOptions {
    /// Empty options: no plugins, no customizer, no autolinks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The note client's standard composition: syntax-highlight classes
    /// on code blocks, heading/link/LaTeX customization against the
    /// current location, and all four autolink extractors.
    #[must_use]
    pub fn base(router: Router, location: Location) -> Self {
        let annotator = Annotator::with_router(router.clone());
        let context = RenderContext::new(router, location);

        Self::new()
            .with_plugin(HighlightPlugin)
            .with_customizer(NoteCustomizer::new(context))
            .with_autolinks(move |text| annotator.annotate(text))
    }

    /// Append a code block plugin.
    #[must_use]
    pub fn with_plugin<P: CodeBlockPlugin + 'static>(mut self, plugin: P) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Install the render customizer.
    #[must_use]
    pub fn with_customizer<C: RenderCustomizer + 'static>(mut self, customizer: C) -> Self {
        self.customizer = Some(Box::new(customizer));
        self
    }

    /// Install the autolink function.
    #[must_use]
    pub fn with_autolinks(
        mut self,
        autolinks: impl Fn(&str) -> AnnotationStream + 'static,
    ) -> Self {
        self.autolinks = Some(Box::new(autolinks));
        self
    }

    /// Capture the first H1 as the note title.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.extract_title = true;
        self
    }

    /// Build the configured renderer.
    #[must_use]
    pub fn build(self) -> NoteRenderer {
        let mut renderer = NoteRenderer::new();
        if self.extract_title {
            renderer = renderer.with_title_extraction();
        }
        for plugin in self.plugins {
            renderer = renderer.with_boxed_plugin(plugin);
        }
        if let Some(customizer) = self.customizer {
            renderer = renderer.with_boxed_customizer(customizer);
        }
        if let Some(autolinks) = self.autolinks {
            renderer = renderer.with_boxed_autolinks(autolinks);
        }
        renderer
    }
}
