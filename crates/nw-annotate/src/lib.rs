//! Inline reference extraction and annotation merging for Notewell.
//!
//! Raw markdown text carries four kinds of inline references that the
//! viewer turns into links without any markdown syntax:
//!
//! - [`url`]: `www.`- or scheme-prefixed URLs
//! - [`email`]: bare email addresses, linked as `mailto:`
//! - [`wiki`]: `[[Note Title]]` links to other notes
//! - [`tag`]: `#hashtag` links to an exact-title search
//!
//! Each extractor is a pure function from source text to [`Span`]s.
//! [`Annotator`] merges all extractor output into a single
//! position-ordered [`AnnotationStream`], which the viewer consumes once
//! per text node during its autolink substitution pass.
//!
//! Extractors never fail: malformed input yields fewer or no matches.
//!
//! # Example
//!
//! ```
//! use nw_annotate::Annotator;
//! use nw_routes::Router;
//!
//! let annotator = Annotator::with_router(Router::new());
//! let spans = annotator.annotate("see [[My Note]] and www.example.com/x");
//! assert_eq!(spans.len(), 2);
//! assert_eq!(spans[0].url, "/note/My%20Note");
//! ```

pub mod email;
mod span;
pub mod tag;
pub mod url;
pub mod wiki;

mod annotator;

pub use annotator::Annotator;
pub use span::{AnnotationStream, Span};
