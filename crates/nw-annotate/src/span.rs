//! Located text references.

/// A located inline reference with its destination URL.
///
/// `range` is an inclusive pair of zero-indexed character offsets into
/// the scanned source string. All extractors measure in the same unit,
/// so spans from different extractors are directly comparable. A span is
/// immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Display text of the reference.
    pub text: String,
    /// Inclusive `(start, end)` character offsets of the matched token.
    pub range: (usize, usize),
    /// Destination, emitted verbatim into an anchor's `href`.
    pub url: String,
}

impl Span {
    /// The substring of `source` covered by this span's range.
    ///
    /// Returns `None` if the range falls outside `source`.
    #[must_use]
    pub fn slice_of<'s>(&self, source: &'s str) -> Option<&'s str> {
        let (start_byte, _) = source.char_indices().nth(self.range.0)?;
        let (end_byte, end_ch) = source.char_indices().nth(self.range.1)?;
        source.get(start_byte..end_byte + end_ch.len_utf8())
    }
}

/// Ordered sequence of spans for one text node, sorted ascending by
/// range start. Used exactly once to drive the viewer's inline-link
/// substitution pass; never persisted.
pub type AnnotationStream = Vec<Span>;

/// Character offset of a byte position within `source`.
///
/// The byte position must lie on a character boundary (extractor matches
/// always do).
pub(crate) fn char_offset(source: &str, byte_offset: usize) -> usize {
    source[..byte_offset].chars().count()
}
