//! Autolink substitution over text nodes.

use std::fmt::Write;

use nw_annotate::AnnotationStream;

use crate::state::escape_html;

/// Function producing the annotation stream for one text node.
pub(crate) type AutolinkFn = Box<dyn Fn(&str) -> AnnotationStream>;

/// Write `text` with annotation spans substituted as anchors.
///
/// Spans must be sorted by range start. The merger does not de-overlap
/// spans from different extractors; a span starting at or before the
/// end of the previously emitted one is skipped here (first wins).
/// Spans falling outside the text are ignored.
pub(crate) fn write_annotated(out: &mut String, text: &str, spans: &AnnotationStream) {
    // Byte offset of each character, plus the end sentinel.
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = offsets.len() - 1;

    let mut cursor = 0usize;
    for span in spans {
        let (start, end) = span.range;
        if start < cursor || start > end || end >= char_count {
            continue;
        }

        out.push_str(&escape_html(&text[offsets[cursor]..offsets[start]]));
        write!(
            out,
            r#"<a href="{}">{}</a>"#,
            escape_html(&span.url),
            escape_html(&span.text)
        )
        .expect("writing to string");
        cursor = end + 1;
    }

    out.push_str(&escape_html(&text[offsets[cursor]..]));
}
