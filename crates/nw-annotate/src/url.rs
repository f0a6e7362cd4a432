//! URL span extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::span::{Span, char_offset};

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(www\.|https?://)(?:[\w-]+\.)*[A-Za-z0-9-]+\.[A-Za-z0-9-]+[^<\s]*[^<?!.,:*_?~\s]")
        .expect("url pattern")
});

static TRAILING_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&[A-Za-z0-9]+;$").expect("entity pattern"));

/// Extract `www.`- or scheme-prefixed URL spans.
///
/// Raw matches are trimmed of a trailing HTML entity reference and of
/// unmatched trailing closing parentheses, then bare `www.` matches are
/// canonicalized with an `http://` scheme.
#[must_use]
pub fn extract(source: &str) -> Vec<Span> {
    let mut result = Vec::new();

    for caps in URL_RE.captures_iter(source) {
        let m = caps.get(0).expect("whole match");
        let text = trim_trailing_entity(m.as_str());
        let text = trim_unmatched_trailing_parens(text);
        if text.is_empty() {
            continue;
        }

        let url = if &caps[1] == "www." {
            format!("http://{text}")
        } else {
            text.to_owned()
        };

        let start = char_offset(source, m.start());
        result.push(Span {
            text: text.to_owned(),
            range: (start, start + text.chars().count() - 1),
            url,
        });
    }

    result
}

fn trim_trailing_entity(source: &str) -> &str {
    match TRAILING_ENTITY_RE.find(source) {
        Some(m) => &source[..m.start()],
        None => source,
    }
}

/// Trim trailing `)` characters with no matching opener.
///
/// The balance runs over the whole token; a `)` can only consume a `(`
/// to its left, so an opener that follows unmatched closers restarts the
/// count.
fn trim_unmatched_trailing_parens(source: &str) -> &str {
    let trailing = source.chars().rev().take_while(|&c| c == ')').count();
    if trailing == 0 {
        return source;
    }

    let mut balance: i64 = 0;
    for ch in source.chars() {
        match ch {
            '(' => {
                if balance < 0 {
                    balance = 1;
                } else {
                    balance += 1;
                }
            }
            ')' => balance -= 1,
            _ => {}
        }
    }

    if balance < 0 {
        let trim = usize::try_from(-balance).unwrap_or(0).min(trailing);
        &source[..source.len() - trim]
    } else {
        source
    }
}
