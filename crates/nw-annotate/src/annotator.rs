//! Annotation merging.

use nw_routes::Router;

use crate::span::AnnotationStream;
use crate::{email, tag, url, wiki};

/// Merges all extractor output into one position-ordered stream.
///
/// Extractors run in a fixed priority order (URL, email, wiki link, tag
/// link) and the concatenated output is stable-sorted by range start, so
/// spans starting at the same offset keep that priority. The merger does
/// not de-overlap spans from different extractors; the consuming
/// renderer resolves true overlaps by first-wins.
///
/// Wiki and tag links need the router to build hrefs. An annotator
/// constructed without one omits those extractors entirely rather than
/// producing broken links.
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    router: Option<Router>,
}

impl Annotator {
    /// Annotator without note routing: URLs and emails only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotator with wiki-link and tag-link extraction enabled.
    #[must_use]
    pub fn with_router(router: Router) -> Self {
        Self {
            router: Some(router),
        }
    }

    /// Scan one text node and return its annotation stream.
    #[must_use]
    pub fn annotate(&self, source: &str) -> AnnotationStream {
        let mut spans = url::extract(source);
        spans.extend(email::extract(source));
        if let Some(router) = &self.router {
            spans.extend(wiki::extract(source, router));
            spans.extend(tag::extract(source, router));
        }

        spans.sort_by_key(|span| span.range.0);
        spans
    }
}
