//! Renderer state machines and HTML escaping.

use pulldown_cmark::Alignment;

/// Escape text for safe embedding in HTML content or attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Code block capture state.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    lang: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    pub(crate) fn start(&mut self, lang: Option<String>) {
        self.active = true;
        self.lang = lang;
        self.buffer.clear();
    }

    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.lang.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub(crate) fn push_newline(&mut self) {
        self.buffer.push('\n');
    }
}

/// Heading capture state.
///
/// Heading children are buffered twice: flattened text feeds the id
/// hook and title extraction, serialized HTML becomes the heading body
/// once the opening tag (with its id) can be written.
#[derive(Default)]
pub(crate) struct HeadingState {
    active: bool,
    level: u8,
    text: String,
    html: String,
}

impl HeadingState {
    pub(crate) fn start(&mut self, level: u8) {
        self.active = true;
        self.level = level;
        self.text.clear();
        self.html.clear();
    }

    /// Finish the heading, returning `(level, text, html)`.
    pub(crate) fn complete(&mut self) -> (u8, String, String) {
        self.active = false;
        (
            self.level,
            std::mem::take(&mut self.text),
            std::mem::take(&mut self.html),
        )
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }
}

/// Table rendering state.
#[derive(Default)]
pub(crate) struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell_index: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Style attribute for the current cell, or empty.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align: left""#,
            Some(Alignment::Center) => r#" style="text-align: center""#,
            Some(Alignment::Right) => r#" style="text-align: right""#,
            _ => "",
        }
    }
}

/// Image alt-text capture state.
#[derive(Default)]
pub(crate) struct ImageState {
    active: bool,
    alt: String,
}

impl ImageState {
    pub(crate) fn start(&mut self) {
        self.active = true;
        self.alt.clear();
    }

    pub(crate) fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_code_block_state_round_trip() {
        let mut state = CodeBlockState::default();
        state.start(Some("rust".to_owned()));
        assert!(state.is_active());
        state.push_str("fn main() {}");
        state.push_newline();
        let (lang, content) = state.end();
        assert_eq!(lang.as_deref(), Some("rust"));
        assert_eq!(content, "fn main() {}\n");
        assert!(!state.is_active());
    }

    #[test]
    fn test_heading_state_buffers() {
        let mut state = HeadingState::default();
        state.start(2);
        state.push_text("Install npm");
        state.push_html("Install <code>npm</code>");
        let (level, text, html) = state.complete();
        assert_eq!(level, 2);
        assert_eq!(text, "Install npm");
        assert_eq!(html, "Install <code>npm</code>");
    }

    #[test]
    fn test_table_alignment_styles() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::None, Alignment::Right]);
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align: left""#
        );
        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");
        state.next_cell();
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align: right""#
        );
    }
}
