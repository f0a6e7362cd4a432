//! Route-to-href resolution.

use crate::location::Location;
use crate::route::Route;

/// Resolves routes to absolute hrefs under an application base path.
///
/// The base path is the prefix the SPA is served from (empty when served
/// at the origin root). Resolved hrefs always begin with the base path,
/// so links remain correct when the client is mounted at a sub-path.
///
/// # Example
///
/// ```
/// use nw_routes::{Route, Router};
///
/// let router = Router::with_base("/notes");
/// assert_eq!(router.resolve(&Route::NewNote), "/notes/new");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Router {
    base: String,
}

impl Router {
    /// Router for a client served at the origin root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Router for a client served under `base`.
    ///
    /// A trailing slash on `base` is ignored; `"/"` is equivalent to the
    /// root base.
    #[must_use]
    pub fn with_base(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    /// The configured base path (no trailing slash).
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute href for a route.
    #[must_use]
    pub fn resolve(&self, route: &Route) -> String {
        format!("{}{}{}", self.base, route.path(), route.query())
    }

    /// Absolute href for a route with a fragment appended.
    ///
    /// `hash` may be passed with or without the leading `#`.
    #[must_use]
    pub fn resolve_with_hash(&self, route: &Route, hash: &str) -> String {
        let hash = hash.strip_prefix('#').unwrap_or(hash);
        format!("{}#{hash}", self.resolve(route))
    }

    /// Absolute href for a concrete location (path + query + hash).
    #[must_use]
    pub fn resolve_location(&self, location: &Location) -> String {
        format!("{}{}", self.base, location.href())
    }
}
