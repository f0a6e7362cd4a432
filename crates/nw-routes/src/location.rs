//! The current navigational position.

use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::route::{Route, SortBy, params};

/// Error parsing a location from a raw path string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("location must start with '/': {0}")]
    NotAbsolute(String),

    #[error("invalid percent-encoding in '{0}'")]
    BadEncoding(String),
}

/// The client's current position: path, query and fragment.
///
/// Constructed fresh per render from the host's address state and handed
/// to the render customizer so same-document hash links can be rewritten
/// against the page actually being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Path without base prefix, always starting with `/`.
    pub path: String,
    /// Decoded query pairs in document order.
    pub query: Vec<(String, String)>,
    /// Fragment without the leading `#`, if any.
    pub hash: Option<String>,
}

impl Location {
    /// Parse a location from a path string like `/note/Guide?x=1#intro`.
    ///
    /// The string must be base-relative (base path already stripped by
    /// the host) and absolute.
    pub fn parse(raw: &str) -> Result<Self, LocationError> {
        if !raw.starts_with('/') {
            return Err(LocationError::NotAbsolute(raw.to_owned()));
        }

        let (without_hash, hash) = match raw.split_once('#') {
            Some((head, frag)) => (head, Some(frag.to_owned())),
            None => (raw, None),
        };
        let (path, query_str) = match without_hash.split_once('?') {
            Some((head, q)) => (head, q),
            None => (without_hash, ""),
        };

        let mut query = Vec::new();
        for pair in query_str.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            query.push((decode(key, raw)?, decode(value, raw)?));
        }

        Ok(Self {
            path: decode(path, raw)?,
            query,
            hash,
        })
    }

    /// The same location with the fragment replaced.
    ///
    /// `hash` may be passed with or without the leading `#`.
    #[must_use]
    pub fn with_hash(&self, hash: &str) -> Self {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        Self {
            hash: Some(hash.to_owned()),
            ..self.clone()
        }
    }

    /// Base-relative href for this location.
    #[must_use]
    pub fn href(&self) -> String {
        let mut href = crate::route::encode_path(&self.path);
        if !self.query.is_empty() {
            let joined: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{k}={}", crate::route::encode_query(v)))
                .collect();
            href.push('?');
            href.push_str(&joined.join("&"));
        }
        if let Some(hash) = &self.hash {
            href.push('#');
            href.push_str(hash);
        }
        href
    }

    /// Match this location against the route table.
    ///
    /// Returns `None` for paths outside the table; unknown query
    /// parameters are ignored.
    #[must_use]
    pub fn route(&self) -> Option<Route> {
        let lookup = |name: &str| -> Option<String> {
            self.query
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };

        match self.path.as_str() {
            "/" => Some(Route::Home),
            "/login" => Some(Route::Login {
                redirect: lookup(params::REDIRECT),
            }),
            "/new" => Some(Route::NewNote),
            "/search" => Some(Route::Search {
                term: lookup(params::SEARCH_TERM).unwrap_or_default(),
                sort_by: lookup(params::SORT_BY).and_then(|v| SortBy::parse(&v)),
            }),
            path => path
                .strip_prefix("/note/")
                .filter(|title| !title.is_empty())
                .map(Route::note),
        }
    }
}

fn decode(part: &str, raw: &str) -> Result<String, LocationError> {
    percent_decode_str(part)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| LocationError::BadEncoding(raw.to_owned()))
}
