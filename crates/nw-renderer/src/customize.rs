//! Render customizer hooks.
//!
//! The viewer rewrites a small, closed set of node kinds during HTML
//! serialization. [`CustomNode`] enumerates them explicitly so an
//! unsupported kind is a compile error rather than a silently ignored
//! string key.

use latex2mathml::{DisplayStyle, latex_to_mathml};
use nw_routes::{Location, Router};

use crate::state::escape_html;

/// Ambient data available to customizer hooks for one render pass.
///
/// Constructed fresh per render and discarded after.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// The client's current navigational position.
    pub location: Location,
    /// Route resolution for building absolute hrefs.
    pub router: Router,
}

impl RenderContext {
    #[must_use]
    pub fn new(router: Router, location: Location) -> Self {
        Self { location, router }
    }
}

/// A node the customizer may rewrite, as seen during serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomNode<'a> {
    /// A heading with its flattened child text.
    Heading { level: u8, text: &'a str },
    /// A link with its default destination.
    Link { href: &'a str },
    /// A LaTeX expression destined for block display.
    LatexBlock { expr: &'a str },
}

/// Per-node rewrite hooks invoked during HTML serialization.
///
/// Container nodes (headings, links) fire once with `entering = true`
/// for the opening boundary and once with `entering = false` for the
/// closing one; leaf nodes (LaTeX blocks) fire only on entering.
/// Returning `None` keeps the renderer's default serialization for that
/// boundary.
pub trait RenderCustomizer {
    fn customize(&self, node: &CustomNode<'_>, entering: bool) -> Option<String>;
}

/// The note client's customizer.
///
/// - Headings get a stable id derived from their text, enabling deep
///   links to sections.
/// - Same-document hash links are rewritten to absolute hrefs resolved
///   against the current location, so they stay correct on non-root
///   paths.
/// - LaTeX blocks are typeset to MathML; malformed expressions fall
///   back to the escaped source rather than failing the document.
pub struct NoteCustomizer {
    context: RenderContext,
}

impl NoteCustomizer {
    #[must_use]
    pub fn new(context: RenderContext) -> Self {
        Self { context }
    }
}

impl RenderCustomizer for NoteCustomizer {
    fn customize(&self, node: &CustomNode<'_>, entering: bool) -> Option<String> {
        if !entering {
            return None;
        }

        match node {
            CustomNode::Heading { level, text } => {
                Some(format!(r#"<h{level} id="{}">"#, heading_slug(text)))
            }
            CustomNode::Link { href } => {
                if !href.starts_with('#') {
                    return None;
                }
                let target = self.context.location.with_hash(href);
                let resolved = self.context.router.resolve_location(&target);
                Some(format!(r#"<a href="{}">"#, escape_html(&resolved)))
            }
            CustomNode::LatexBlock { expr } => {
                let markup = match latex_to_mathml(expr, DisplayStyle::Block) {
                    Ok(mathml) => mathml,
                    Err(_) => format!("<code>{}</code>", escape_html(expr)),
                };
                Some(format!(r#"<div class="latex-block">{markup}</div>"#))
            }
        }
    }
}

/// Stable identifier for a heading.
///
/// Lowercases the flattened text, strips every character outside
/// `[a-z0-9-\s]`, trims, and collapses internal whitespace runs to
/// single hyphens.
#[must_use]
pub fn heading_slug(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}
