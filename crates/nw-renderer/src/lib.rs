//! Markdown viewer engine for Notewell.
//!
//! This crate is the document-rendering half of the note client: it
//! turns a note's markdown into the HTML fragment the viewer commits to
//! the page. It never owns note content or navigation — those arrive
//! through [`ViewerOptions`].
//!
//! # Architecture
//!
//! - [`NoteRenderer`]: event-driven serializer over pulldown-cmark.
//! - [`RenderCustomizer`]: tagged-variant hook dispatch for the node
//!   kinds the client rewrites (headings, links, LaTeX blocks), with
//!   [`NoteCustomizer`] as the client's implementation.
//! - [`CodeBlockPlugin`]: ordered extension chain for fenced code
//!   blocks; [`HighlightPlugin`] tags blocks for client-side syntax
//!   highlighting and diagram mounting.
//! - [`ViewerOptions`]: composes plugins, customizer and the
//!   annotation-backed autolink pass into one configuration value.
//!
//! # Example
//!
//! ```
//! use nw_renderer::ViewerOptions;
//! use nw_routes::{Location, Router};
//!
//! let location = Location::parse("/note/Demo").unwrap();
//! let mut renderer = ViewerOptions::base(Router::new(), location).build();
//! let result = renderer.render_markdown("# Hello\n\nsee [[Other Note]]");
//! assert!(result.html.contains(r#"<h1 id="hello">"#));
//! assert!(result.html.contains(r#"href="/note/Other%20Note""#));
//! ```

mod autolink;
mod customize;
mod options;
mod plugin;
mod renderer;
mod state;

pub use customize::{CustomNode, NoteCustomizer, RenderContext, RenderCustomizer, heading_slug};
pub use options::ViewerOptions;
pub use plugin::{CodeBlockPlugin, HighlightPlugin, PluginResult};
pub use renderer::{NoteRenderer, RenderResult};
pub use state::escape_html;
