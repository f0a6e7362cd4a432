//! Event-driven markdown renderer.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::autolink::{AutolinkFn, write_annotated};
use crate::customize::{CustomNode, RenderCustomizer};
use crate::plugin::{CodeBlockPlugin, PluginResult};
use crate::state::{CodeBlockState, HeadingState, ImageState, TableState, escape_html};

/// Result of rendering a note.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Title extracted from the first H1 heading (if enabled).
    pub title: Option<String>,
    /// Warnings from code block plugins.
    pub warnings: Vec<String>,
}

/// Markdown viewer engine.
///
/// Consumes parsed markdown events and serializes HTML, delegating the
/// rewritable node kinds to the configured [`RenderCustomizer`], fenced
/// code blocks to the [`CodeBlockPlugin`] chain, and plain text nodes to
/// the autolink substitution pass. Usually constructed through
/// [`ViewerOptions`](crate::ViewerOptions).
pub struct NoteRenderer {
    output: String,
    /// Flow text accumulated until the next non-text event, so the
    /// autolink pass sees whole text nodes even where the parser splits
    /// them (e.g. around unresolved brackets).
    flow: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    pending_image: Option<(String, String)>,
    link_stack: Vec<String>,
    code_block_index: usize,
    plugins: Vec<Box<dyn CodeBlockPlugin>>,
    customizer: Option<Box<dyn RenderCustomizer>>,
    autolinks: Option<AutolinkFn>,
    extract_title: bool,
    title: Option<String>,
}

impl NoteRenderer {
    /// Create a bare renderer with no plugins, customizer or autolinks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            flow: String::new(),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            pending_image: None,
            link_stack: Vec::new(),
            code_block_index: 0,
            plugins: Vec::new(),
            customizer: None,
            autolinks: None,
            extract_title: false,
            title: None,
        }
    }

    /// Capture the first H1 as the note title (still rendered).
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.extract_title = true;
        self
    }

    /// Append a code block plugin. Plugins are checked in order; the
    /// first returning a non-passthrough result wins.
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

    /// Install the autolink pass applied to flow text nodes.
    #[must_use]
    pub fn with_autolinks(
        mut self,
        autolinks: impl Fn(&str) -> nw_annotate::AnnotationStream + 'static,
    ) -> Self {
        self.autolinks = Some(Box::new(autolinks));
        self
    }

    pub(crate) fn with_boxed_plugin(mut self, plugin: Box<dyn CodeBlockPlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub(crate) fn with_boxed_customizer(mut self, customizer: Box<dyn RenderCustomizer>) -> Self {
        self.customizer = Some(customizer);
        self
    }

    pub(crate) fn with_boxed_autolinks(mut self, autolinks: AutolinkFn) -> Self {
        self.autolinks = Some(autolinks);
        self
    }

    /// Parser options for note markdown: GFM tables, strikethrough and
    /// task lists, plus `$`/`$$` math for the LaTeX extension.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_MATH
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text directly.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        self.render(self.create_parser(markdown))
    }

    /// Render markdown events and return the result.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }
        self.flush_flow();

        RenderResult {
            html: std::mem::take(&mut self.output),
            title: self.title.take(),
            warnings: self
                .plugins
                .iter()
                .flat_map(|p| p.warnings())
                .cloned()
                .collect(),
        }
    }

    /// Offer a node boundary to the customizer.
    fn customize(&self, node: &CustomNode<'_>, entering: bool) -> Option<String> {
        self.customizer
            .as_ref()
            .and_then(|c| c.customize(node, entering))
    }

    /// Push content to the output or the heading buffer.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    /// Whether flow text is currently being accumulated.
    fn in_flow(&self) -> bool {
        !self.code.is_active()
            && !self.image.is_active()
            && !self.heading.is_active()
            && self.link_stack.is_empty()
    }

    /// Emit accumulated flow text through the autolink pass.
    fn flush_flow(&mut self) {
        if self.flow.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.flow);
        match &self.autolinks {
            Some(annotate) => {
                let spans = annotate(&text);
                write_annotated(&mut self.output, &text, &spans);
            }
            None => self.output.push_str(&escape_html(&text)),
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        // Text (and in-paragraph soft breaks) extend the current flow
        // node; everything else terminates it.
        if let Event::Text(text) = &event {
            self.text(text);
            return;
        }
        if matches!(event, Event::SoftBreak) && self.in_flow() {
            self.flow.push('\n');
            return;
        }
        self.flush_flow();

        match event {
            Event::Start(tag) => self.start_tag(&tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(_) => {}
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.output.push_str(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br />"),
            Event::Rule => self.output.push_str("<hr />"),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::DisplayMath(expr) => self.display_math(&expr),
            Event::InlineMath(expr) => {
                let html = format!(
                    r#"<span class="latex-inline">{}</span>"#,
                    escape_html(&expr)
                );
                self.push_inline(&html);
            }
            Event::FootnoteReference(_) => {
                // Not supported
            }
        }
    }

    fn start_tag(&mut self, tag: &Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("<p>");
                }
            }
            Tag::Heading { level, .. } => {
                // Children are buffered; the opening tag is written in
                // end_tag once the flattened text is known.
                self.heading.start(heading_level_to_num(*level));
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) if !info.is_empty() => info
                        .split_whitespace()
                        .next()
                        .map(std::borrow::ToOwned::to_owned),
                    _ => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).expect("writing to string"),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(alignments) => {
                self.table.start(alignments.clone());
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let cell = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{cell}{align}>").expect("writing to string");
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link { dest_url, .. } => {
                let node = CustomNode::Link {
                    href: dest_url.as_ref(),
                };
                let opening = self.customize(&node, true).unwrap_or_else(|| {
                    format!(r#"<a href="{}">"#, escape_html(dest_url))
                });
                self.push_inline(&opening);
                self.link_stack.push(dest_url.to_string());
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Collect alt text; the element is written in end_tag.
                self.image.start();
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("</p>");
                }
            }
            TagEnd::Heading(_) => self.finish_heading(),
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => self.finish_code_block(),
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => {
                let href = self.link_stack.pop().unwrap_or_default();
                let node = CustomNode::Link { href: &href };
                let closing = self
                    .customize(&node, false)
                    .unwrap_or_else(|| "</a>".to_owned());
                self.push_inline(&closing);
            }
            TagEnd::Image => {
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    let title_attr = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(&title))
                    };
                    write!(
                        self.output,
                        r#"<img src="{}"{title_attr} alt="{}" />"#,
                        escape_html(&src),
                        escape_html(&alt)
                    )
                    .expect("writing to string");
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn finish_heading(&mut self) {
        let (level, text, html) = self.heading.complete();

        if self.extract_title && level == 1 && self.title.is_none() {
            self.title = Some(text.trim().to_owned());
        }

        let node = CustomNode::Heading {
            level,
            text: &text,
        };
        let opening = self
            .customize(&node, true)
            .unwrap_or_else(|| format!("<h{level}>"));
        let closing = self
            .customize(&node, false)
            .unwrap_or_else(|| format!("</h{level}>"));
        write!(self.output, "{opening}{}{closing}", html.trim()).expect("writing to string");
    }

    fn finish_code_block(&mut self) {
        let (lang, content) = self.code.end();
        let index = self.code_block_index;
        self.code_block_index += 1;

        for plugin in &mut self.plugins {
            if let PluginResult::Html(html) = plugin.process(lang.as_deref(), &content, index) {
                self.output.push_str(&html);
                return;
            }
        }

        if let Some(lang) = lang {
            write!(
                self.output,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(&lang),
                escape_html(&content)
            )
            .expect("writing to string");
        } else {
            write!(
                self.output,
                "<pre><code>{}</code></pre>",
                escape_html(&content)
            )
            .expect("writing to string");
        }
    }

    fn display_math(&mut self, expr: &str) {
        let node = CustomNode::LatexBlock { expr };
        let html = self.customize(&node, true).unwrap_or_else(|| {
            format!(
                r#"<div class="latex-block"><code>{}</code></div>"#,
                escape_html(expr)
            )
        });
        self.output.push_str(&html);
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
        } else if self.link_stack.is_empty() {
            // Flow text: accumulate for the autolink pass.
            self.flow.push_str(text);
        } else {
            // Already inside a link; anchors must not nest.
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.heading.is_active() {
            self.heading.push_text(code);
            self.heading
                .push_html(&format!("<code>{}</code>", escape_html(code)));
        } else {
            write!(self.output, "<code>{}</code>", escape_html(code)).expect("writing to string");
        }
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else {
            self.output.push('\n');
        }
    }

    // Attribute values stay explicit so the committed fragment remains
    // well-formed for the post-render DOM passes.
    fn task_list_marker(&mut self, checked: bool) {
        self.output.push_str(if checked {
            r#"<input type="checkbox" checked="" disabled="" />"#
        } else {
            r#"<input type="checkbox" disabled="" />"#
        });
    }
}

impl Default for NoteRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customize::{NoteCustomizer, RenderContext};
    use crate::plugin::HighlightPlugin;
    use nw_annotate::Annotator;
    use nw_routes::{Location, Router};
    use pretty_assertions::assert_eq;

    fn render_plain(markdown: &str) -> RenderResult {
        NoteRenderer::new().render_markdown(markdown)
    }

    fn render_customized(markdown: &str, path: &str) -> RenderResult {
        let context = RenderContext::new(Router::new(), Location::parse(path).unwrap());
        NoteRenderer::new()
            .with_customizer(NoteCustomizer::new(context))
            .render_markdown(markdown)
    }

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(render_plain("Hello, world!").html, "<p>Hello, world!</p>");
    }

    #[test]
    fn test_heading_without_customizer() {
        assert_eq!(render_plain("## Plain").html, "<h2>Plain</h2>");
    }

    #[test]
    fn test_heading_id_from_customizer() {
        let result = render_customized("## Hello, World! 2.0", "/note/X");
        assert_eq!(
            result.html,
            r#"<h2 id="hello-world-20">Hello, World! 2.0</h2>"#
        );
    }

    #[test]
    fn test_heading_with_inline_code() {
        let result = render_customized("## Install `npm`", "/note/X");
        assert_eq!(
            result.html,
            r#"<h2 id="install-npm">Install <code>npm</code></h2>"#
        );
    }

    #[test]
    fn test_duplicate_headings_share_id() {
        let result = render_customized("## FAQ\n\n## FAQ", "/note/X");
        assert_eq!(result.html.matches(r##"id="faq""##).count(), 2);
    }

    #[test]
    fn test_hash_link_rewritten() {
        let result = render_customized("[jump](#setup)", "/note/Guide");
        assert_eq!(
            result.html,
            r#"<p><a href="/note/Guide#setup">jump</a></p>"#
        );
    }

    #[test]
    fn test_regular_link_unchanged() {
        let result = render_customized("[x](https://example.com)", "/note/Guide");
        assert_eq!(
            result.html,
            r#"<p><a href="https://example.com">x</a></p>"#
        );
    }

    #[test]
    fn test_title_extraction() {
        let result = NoteRenderer::new()
            .with_title_extraction()
            .render_markdown("# My Title\n\nBody\n\n# Second");
        assert_eq!(result.title.as_deref(), Some("My Title"));
        // First H1 is still rendered.
        assert!(result.html.contains("<h1>My Title</h1>"));
    }

    #[test]
    fn test_no_title_without_extraction() {
        assert_eq!(render_plain("# My Title").title, None);
    }

    #[test]
    fn test_code_block_default() {
        let result = render_plain("```\nplain text\n```");
        assert_eq!(result.html, "<pre><code>plain text\n</code></pre>");
    }

    #[test]
    fn test_code_block_with_highlight_plugin() {
        let result = NoteRenderer::new()
            .with_plugin(HighlightPlugin)
            .render_markdown("```rust\nfn main() {}\n```");
        assert_eq!(
            result.html,
            r#"<pre class="lang-rust"><code class="language-rust">fn main() {}
</code></pre>"#
        );
    }

    #[test]
    fn test_mermaid_block_keeps_source() {
        let result = NoteRenderer::new()
            .with_plugin(HighlightPlugin)
            .render_markdown("```mermaid\ngraph TD; A-->B;\n```");
        assert!(result.html.contains(r#"<pre class="lang-mermaid">"#));
        assert!(result.html.contains("graph TD; A--&gt;B;"));
    }

    #[test]
    fn test_autolink_pass_on_flow_text() {
        let mut renderer = NoteRenderer::new()
            .with_autolinks(move |text| Annotator::with_router(Router::new()).annotate(text));
        let result = renderer.render_markdown("see [[My Note]] and #tag now");
        assert!(
            result
                .html
                .contains(r#"<a href="/note/My%20Note">My Note</a>"#)
        );
        assert!(
            result
                .html
                .contains(r#"<a href="/search?term=%23tag&amp;sortBy=1">#tag</a>"#)
        );
    }

    #[test]
    fn test_autolink_not_applied_inside_links() {
        let mut renderer = NoteRenderer::new()
            .with_autolinks(move |text| Annotator::with_router(Router::new()).annotate(text));
        let result = renderer.render_markdown("[www.example.com](https://example.com)");
        assert_eq!(
            result.html,
            r#"<p><a href="https://example.com">www.example.com</a></p>"#
        );
    }

    #[test]
    fn test_autolink_not_applied_inside_code() {
        let mut renderer = NoteRenderer::new()
            .with_autolinks(move |text| Annotator::with_router(Router::new()).annotate(text));
        let result = renderer.render_markdown("`www.example.com`");
        assert_eq!(result.html, "<p><code>www.example.com</code></p>");
    }

    #[test]
    fn test_display_math_via_customizer() {
        let result = render_customized("$$x^2$$", "/note/Math");
        assert!(result.html.contains(r#"<div class="latex-block">"#));
        assert!(result.html.contains("<math"));
    }

    #[test]
    fn test_display_math_without_customizer() {
        let result = render_plain("$$x^2$$");
        assert_eq!(
            result.html,
            r#"<p><div class="latex-block"><code>x^2</code></div></p>"#
        );
    }

    #[test]
    fn test_inline_math_escaped() {
        let result = render_plain("value $a<b$ here");
        assert!(
            result
                .html
                .contains(r#"<span class="latex-inline">a&lt;b</span>"#)
        );
    }

    #[test]
    fn test_table() {
        let result = render_plain("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(result.html.contains("<table>"));
        assert!(result.html.contains("<thead><tr><th>A</th><th>B</th>"));
        assert!(result.html.contains("<tbody><tr><td>1</td><td>2</td>"));
    }

    #[test]
    fn test_task_list() {
        let result = render_plain("- [ ] open\n- [x] done");
        assert!(
            result
                .html
                .contains(r#"<input type="checkbox" disabled="" />"#)
        );
        assert!(
            result
                .html
                .contains(r#"<input type="checkbox" checked="" disabled="" />"#)
        );
    }

    #[test]
    fn test_lists_and_emphasis() {
        let result = render_plain("1. *a*\n2. **b**");
        assert!(result.html.contains("<ol>"));
        assert!(result.html.contains("<em>a</em>"));
        assert!(result.html.contains("<strong>b</strong>"));
    }

    #[test]
    fn test_image_self_closing() {
        let result = render_plain("![Alt](pic.png)");
        assert_eq!(
            result.html,
            r#"<p><img src="pic.png" alt="Alt" /></p>"#
        );
    }

    #[test]
    fn test_blockquote() {
        let result = render_plain("> quoted");
        assert_eq!(result.html, "<blockquote><p>quoted</p></blockquote>");
    }

    #[test]
    fn test_hard_break_and_rule() {
        let result = render_plain("a  \nb\n\n---");
        assert!(result.html.contains("<br />"));
        assert!(result.html.contains("<hr />"));
    }
}
