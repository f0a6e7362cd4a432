//! Client route table and href resolution for Notewell.
//!
//! The note client is a single-page application; every navigable surface
//! is one of a fixed set of routes. This crate provides:
//!
//! - [`Route`]: the typed route table (home, login, note, new, search)
//! - [`Router`]: resolution of a route to an absolute href under a base path
//! - [`Location`]: the current navigational position, parseable from a path
//!
//! Renderer hooks and span extractors use [`Router::resolve`] to build
//! hrefs that stay correct when the application is served from a
//! non-root path.
//!
//! # Example
//!
//! ```
//! use nw_routes::{Route, Router};
//!
//! let router = Router::new();
//! let href = router.resolve(&Route::note("My Note"));
//! assert_eq!(href, "/note/My%20Note");
//! ```

mod location;
mod route;
mod router;

pub use location::{Location, LocationError};
pub use route::{Route, SortBy, params};
pub use router::Router;
