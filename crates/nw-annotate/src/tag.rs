//! Tag-link span extraction.

use std::sync::LazyLock;

use nw_routes::{Route, Router, SortBy};
use regex::Regex;

use crate::span::{Span, char_offset};

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)(#[\w-]+)").expect("tag pattern"));

/// Extract `#hashtag` spans resolved to an exact-title search.
///
/// A tag must be preceded by start-of-string or whitespace and followed
/// by whitespace or end-of-string, so a `#` inside a URL or identifier
/// never matches. The captured range excludes the triggering whitespace.
#[must_use]
pub fn extract(source: &str, router: &Router) -> Vec<Span> {
    let mut result = Vec::new();

    for caps in TAG_RE.captures_iter(source) {
        let m = caps.get(1).expect("tag group");
        let next = source[m.end()..].chars().next();
        if next.is_some_and(|c| !c.is_whitespace()) {
            continue;
        }

        let text = m.as_str();
        let start = char_offset(source, m.start());
        result.push(Span {
            text: text.to_owned(),
            range: (start, start + text.chars().count() - 1),
            url: router.resolve(&Route::search(text, Some(SortBy::Title))),
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_basic_tag() {
        let spans = extract("great #idea here", &Router::new());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "#idea");
        assert_eq!(spans[0].range, (6, 10));
        assert_eq!(spans[0].url, "/search?term=%23idea&sortBy=1");
    }

    #[test]
    fn test_tag_at_start_and_end() {
        let spans = extract("#first middle #last", &Router::new());
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].range, (0, 5));
        assert_eq!(spans[1].text, "#last");
    }

    #[test]
    fn test_mid_word_hash_rejected() {
        assert!(extract("url#idea", &Router::new()).is_empty());
        assert!(extract("https://x.io/#frag", &Router::new()).is_empty());
    }

    #[test]
    fn test_trailing_punctuation_rejected() {
        // The character after the tag run is neither whitespace nor end.
        assert!(extract("#tag! done", &Router::new()).is_empty());
    }

    #[test]
    fn test_adjacent_tags() {
        let spans = extract("#a #b", &Router::new());
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_hyphenated_tag() {
        let spans = extract("see #follow-up now", &Router::new());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "#follow-up");
    }
}
