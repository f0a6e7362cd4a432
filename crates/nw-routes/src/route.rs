//! The typed route table.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Query parameter names used in hrefs and accepted back on parse.
pub mod params {
    /// Search term parameter on the search route.
    pub const SEARCH_TERM: &str = "term";
    /// Sort order parameter on the search route.
    pub const SORT_BY: &str = "sortBy";
    /// Post-login redirect target on the login route.
    pub const REDIRECT: &str = "redirect";
}

/// Characters escaped inside a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Characters escaped inside a query value.
const QUERY: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'&')
    .add(b'+')
    .add(b'%');

/// Percent-encode a path, preserving `/` separators.
pub(crate) fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|seg| utf8_percent_encode(seg, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Percent-encode a query value.
pub(crate) fn encode_query(value: &str) -> String {
    utf8_percent_encode(value, QUERY).to_string()
}

/// Sort order for search results.
///
/// The numeric wire values are part of the URL contract with the notes
/// server and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortBy {
    /// Relevance score (server default).
    Score,
    /// Exact title match first.
    Title,
    /// Most recently modified first.
    LastModified,
}

impl SortBy {
    /// Wire value used in the `sortBy` query parameter.
    #[must_use]
    pub fn query_value(self) -> &'static str {
        match self {
            Self::Score => "0",
            Self::Title => "1",
            Self::LastModified => "2",
        }
    }

    /// Parse a `sortBy` query value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "0" => Some(Self::Score),
            "1" => Some(Self::Title),
            "2" => Some(Self::LastModified),
            _ => None,
        }
    }
}

/// A navigable route of the note client.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Route {
    /// The note list at `/`.
    Home,
    /// The login form at `/login`.
    Login {
        /// Path to return to after authentication.
        redirect: Option<String>,
    },
    /// A single note at `/note/:title`.
    Note { title: String },
    /// The blank editor at `/new`.
    NewNote,
    /// Search results at `/search`.
    Search {
        term: String,
        sort_by: Option<SortBy>,
    },
}

impl Route {
    /// Convenience constructor for the note route.
    pub fn note(title: impl Into<String>) -> Self {
        Self::Note {
            title: title.into(),
        }
    }

    /// Convenience constructor for the search route.
    pub fn search(term: impl Into<String>, sort_by: Option<SortBy>) -> Self {
        Self::Search {
            term: term.into(),
            sort_by,
        }
    }

    /// Path portion of the href, percent-encoded, without base or query.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Login { .. } => "/login".to_owned(),
            Self::Note { title } => {
                format!("/note/{}", utf8_percent_encode(title, SEGMENT))
            }
            Self::NewNote => "/new".to_owned(),
            Self::Search { .. } => "/search".to_owned(),
        }
    }

    /// Query string of the href including the leading `?`, or empty.
    #[must_use]
    pub fn query(&self) -> String {
        let pairs: Vec<(&str, String)> = match self {
            Self::Home | Self::NewNote | Self::Note { .. } => Vec::new(),
            Self::Login { redirect } => redirect
                .iter()
                .map(|r| (params::REDIRECT, utf8_percent_encode(r, QUERY).to_string()))
                .collect(),
            Self::Search { term, sort_by } => {
                let mut pairs = vec![(
                    params::SEARCH_TERM,
                    utf8_percent_encode(term, QUERY).to_string(),
                )];
                if let Some(sort) = sort_by {
                    pairs.push((params::SORT_BY, sort.query_value().to_owned()));
                }
                pairs
            }
        };

        if pairs.is_empty() {
            return String::new();
        }
        let joined: Vec<String> = pairs
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("?{}", joined.join("&"))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.path(), self.query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_home_path() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Home.query(), "");
    }

    #[test]
    fn test_note_path_encodes_title() {
        let route = Route::note("Meeting Notes 2024/Q1");
        assert_eq!(route.path(), "/note/Meeting%20Notes%202024%2FQ1");
    }

    #[test]
    fn test_search_query() {
        let route = Route::search("#idea", Some(SortBy::Title));
        assert_eq!(route.path(), "/search");
        assert_eq!(route.query(), "?term=%23idea&sortBy=1");
    }

    #[test]
    fn test_search_without_sort() {
        let route = Route::search("rust", None);
        assert_eq!(route.query(), "?term=rust");
    }

    #[test]
    fn test_login_redirect() {
        let route = Route::Login {
            redirect: Some("/note/Todo".to_owned()),
        };
        assert_eq!(route.to_string(), "/login?redirect=/note/Todo");
    }

    #[test]
    fn test_sort_by_wire_values() {
        assert_eq!(SortBy::Score.query_value(), "0");
        assert_eq!(SortBy::Title.query_value(), "1");
        assert_eq!(SortBy::LastModified.query_value(), "2");
        assert_eq!(SortBy::parse("1"), Some(SortBy::Title));
        assert_eq!(SortBy::parse("3"), None);
    }
}
