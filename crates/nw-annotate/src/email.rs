//! Email span extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::span::{Span, char_offset};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.+-]+@(?:[\w-]+\.)+[\w-]+").expect("email pattern"));

/// Extract bare email address spans, linked as `mailto:` URLs.
///
/// A match whose text ends in `_` or `-` is sentence-trailing
/// punctuation rather than part of the address and is rejected.
#[must_use]
pub fn extract(source: &str) -> Vec<Span> {
    let mut result = Vec::new();

    for m in EMAIL_RE.find_iter(source) {
        let text = m.as_str();
        if text.ends_with(['_', '-']) {
            continue;
        }

        let start = char_offset(source, m.start());
        result.push(Span {
            text: text.to_owned(),
            range: (start, start + text.chars().count() - 1),
            url: format!("mailto:{text}"),
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_basic_email() {
        let spans = extract("contact me at a.b@example.com!");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "a.b@example.com");
        assert_eq!(spans[0].url, "mailto:a.b@example.com");
        assert_eq!(spans[0].range, (14, 28));
    }

    #[test]
    fn test_trailing_underscore_rejected() {
        assert!(extract("foo@bar.com_").is_empty());
        assert!(extract("foo@bar.com-").is_empty());
    }

    #[test]
    fn test_plus_addressing() {
        let spans = extract("a+tag@example.co.uk");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "a+tag@example.co.uk");
    }

    #[test]
    fn test_multiple_emails() {
        let spans = extract("a@x.io and b@y.io");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "a@x.io");
        assert_eq!(spans[1].text, "b@y.io");
    }

    #[test]
    fn test_no_match_returns_empty() {
        assert!(extract("not an address").is_empty());
    }

    #[test]
    fn test_range_matches_text() {
        let source = "mail é a.b@example.com now";
        let spans = extract(source);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].slice_of(source), Some("a.b@example.com"));
    }
}
