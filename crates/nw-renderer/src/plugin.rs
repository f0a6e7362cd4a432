//! Code block plugin chain.

use crate::state::escape_html;

/// Outcome of offering a code block to a plugin.
pub enum PluginResult {
    /// Serialized replacement for the whole block.
    Html(String),
    /// Not handled; try the next plugin or the default rendering.
    PassThrough,
}

/// Extension point for fenced code blocks.
///
/// Plugins are checked in registration order when a code block is
/// encountered; the first returning [`PluginResult::Html`] wins.
/// `index` is the zero-based position of the block in the document.
pub trait CodeBlockPlugin {
    fn process(&mut self, language: Option<&str>, source: &str, index: usize) -> PluginResult;

    /// Warnings accumulated during processing.
    fn warnings(&self) -> &[String] {
        &[]
    }
}

/// Tags fenced code blocks for client-side syntax highlighting.
///
/// Emits the `lang-*`/`language-*` class pair the client's highlighter
/// keys on. Diagram mounting also depends on this shape: the mount
/// manager locates `pre.lang-mermaid` blocks in the committed tree, so
/// the raw source must survive inside the element.
pub struct HighlightPlugin;

impl CodeBlockPlugin for HighlightPlugin {
    fn process(&mut self, language: Option<&str>, source: &str, _index: usize) -> PluginResult {
        let Some(lang) = language else {
            return PluginResult::PassThrough;
        };

        let lang = escape_html(lang);
        PluginResult::Html(format!(
            r#"<pre class="lang-{lang}"><code class="language-{lang}">{}</code></pre>"#,
            escape_html(source)
        ))
    }
}
