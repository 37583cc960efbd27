//! Annotations: labeled half-open spans over the session document.
//!
//! Offsets are byte offsets into the document, always on `char` boundaries
//! (span creation snaps selections to word edges before anything else sees
//! them). The annotated `text` is cached at creation time; the document is
//! immutable for the session, so the copy never goes stale.

use crate::label::LabelId;
use serde::{Deserialize, Serialize};

/// Identifier for an annotation, unique and monotonic within a session.
pub type AnnotationId = u64;

/// A labeled span in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Unique id, monotonic in creation order.
    pub id: AnnotationId,
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive). Always greater than `start`.
    pub end: usize,
    /// The covered text, cached at creation time.
    pub text: String,
    /// The label this span was marked with.
    pub label_id: LabelId,
    /// Short identifier of the annotator who created the span.
    pub annotator: String,
}

impl Annotation {
    /// Half-open interval intersection test; touching endpoints do not
    /// overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Annotation) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check whether this span overlaps the raw range `[start, end)`.
    #[must_use]
    pub fn overlaps_range(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }

    /// Check whether this span fully covers `[start, end)`.
    #[must_use]
    pub fn covers(&self, start: usize, end: usize) -> bool {
        self.start <= start && self.end >= end
    }

    /// Span width in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Empty spans are rejected at creation, so this is always false for
    /// live annotations; kept for symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Free-form key/value metadata attached to an annotation.
///
/// Keys are not unique; attaching the same key twice keeps both entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Unique metadata entry id.
    pub id: u64,
    /// The annotation this entry is attached to.
    pub annotation_id: AnnotationId,
    /// Metadata key.
    pub key: String,
    /// Metadata value.
    pub value: String,
}

/// Widen a raw selection to whole-word boundaries.
///
/// `start` walks left while the preceding character is non-whitespace;
/// `end` walks right while the character at `end` is non-whitespace. Inputs
/// are clamped to document bounds and to `char` boundaries first, so this is
/// total over arbitrary offsets. Returns `None` when the selection snaps to
/// an empty range.
#[must_use]
pub fn snap_to_word_boundaries(doc: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let mut end = end.min(doc.len());
    let mut start = start.min(end);
    while start > 0 && !doc.is_char_boundary(start) {
        start -= 1;
    }
    while end < doc.len() && !doc.is_char_boundary(end) {
        end += 1;
    }

    while let Some(prev) = doc[..start].chars().next_back() {
        if prev.is_whitespace() {
            break;
        }
        start -= prev.len_utf8();
    }
    while let Some(next) = doc[end..].chars().next() {
        if next.is_whitespace() {
            break;
        }
        end += next.len_utf8();
    }

    if start == end {
        None
    } else {
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann(id: u64, start: usize, end: usize) -> Annotation {
        Annotation {
            id,
            start,
            end,
            text: String::new(),
            label_id: 1,
            annotator: "AB".to_string(),
        }
    }

    #[test]
    fn touching_spans_do_not_overlap() {
        let a = ann(1, 0, 4);
        let b = ann(2, 4, 8);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn nested_spans_overlap() {
        let outer = ann(1, 0, 10);
        let inner = ann(2, 3, 5);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn covers_is_inclusive_at_both_ends() {
        let a = ann(1, 2, 8);
        assert!(a.covers(2, 8));
        assert!(a.covers(3, 7));
        assert!(!a.covers(1, 8));
        assert!(!a.covers(2, 9));
    }

    #[test]
    fn snap_extends_partial_word_selection() {
        // "The cat sat." with a selection in the middle of "cat".
        let doc = "The cat sat.";
        assert_eq!(snap_to_word_boundaries(doc, 5, 6), Some((4, 7)));
    }

    #[test]
    fn snap_keeps_whole_word_selection() {
        let doc = "The cat sat.";
        assert_eq!(snap_to_word_boundaries(doc, 4, 7), Some((4, 7)));
    }

    #[test]
    fn snap_crosses_word_gaps_only_outward() {
        let doc = "The cat sat.";
        // Selection spanning the space widens to both words.
        assert_eq!(snap_to_word_boundaries(doc, 2, 5), Some((0, 7)));
    }

    #[test]
    fn snap_inside_whitespace_run_is_empty() {
        let doc = "a  b";
        assert_eq!(snap_to_word_boundaries(doc, 2, 2), None);
    }

    #[test]
    fn snap_zero_width_in_word_grabs_the_word() {
        let doc = "a b";
        assert_eq!(snap_to_word_boundaries(doc, 1, 1), Some((0, 1)));
    }

    #[test]
    fn snap_clamps_out_of_bounds() {
        let doc = "word";
        assert_eq!(snap_to_word_boundaries(doc, 2, 100), Some((0, 4)));
    }

    #[test]
    fn snap_respects_char_boundaries() {
        let doc = "naïve test";
        // Offset 3 is inside the two-byte 'ï'; snapping must not split it.
        let (start, end) = snap_to_word_boundaries(doc, 3, 3).unwrap();
        assert_eq!(&doc[start..end], "naïve");
    }

    #[test]
    fn snap_empty_document() {
        assert_eq!(snap_to_word_boundaries("", 0, 0), None);
    }
}
