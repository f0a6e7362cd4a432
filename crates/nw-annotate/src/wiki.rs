//! Wiki-link span extraction.

use std::sync::LazyLock;

use nw_routes::{Route, Router};
use regex::Regex;

use crate::span::{Span, char_offset};

static WIKI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]]+?)\]\]").expect("wiki-link pattern"));

/// Extract `[[Note Title]]` spans resolved to the note route by title.
///
/// The inner text is whitespace-trimmed and must be non-empty; brackets
/// inside the title are not allowed, so unbalanced input simply yields
/// no match. The span's range covers the whole double-bracket token.
#[must_use]
pub fn extract(source: &str, router: &Router) -> Vec<Span> {
    let mut result = Vec::new();

    for caps in WIKI_RE.captures_iter(source) {
        let m = caps.get(0).expect("whole match");
        let title = caps[1].trim();
        if title.is_empty() {
            continue;
        }

        let start = char_offset(source, m.start());
        result.push(Span {
            text: title.to_owned(),
            range: (start, start + m.as_str().chars().count() - 1),
            url: router.resolve(&Route::note(title)),
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_basic_wiki_link() {
        let spans = extract("see [[My Note]]", &Router::new());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "My Note");
        assert_eq!(spans[0].url, "/note/My%20Note");
        // Range covers the whole [[...]] token.
        assert_eq!(spans[0].range, (4, 14));
    }

    #[test]
    fn test_inner_whitespace_trimmed() {
        let spans = extract("[[  Weekly Plan  ]]", &Router::new());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Weekly Plan");
        assert_eq!(spans[0].url, "/note/Weekly%20Plan");
    }

    #[test]
    fn test_empty_inner_rejected() {
        assert!(extract("[[]]", &Router::new()).is_empty());
        assert!(extract("[[   ]]", &Router::new()).is_empty());
    }

    #[test]
    fn test_nested_brackets_rejected() {
        assert!(extract("[[a[b]]", &Router::new()).is_empty());
    }

    #[test]
    fn test_multiple_links() {
        let spans = extract("[[One]] then [[Two]]", &Router::new());
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "One");
        assert_eq!(spans[1].text, "Two");
    }

    #[test]
    fn test_base_path_in_href() {
        let spans = extract("[[Guide]]", &Router::with_base("/notes"));
        assert_eq!(spans[0].url, "/notes/note/Guide");
    }
}
