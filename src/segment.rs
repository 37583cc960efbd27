//! Segmentation engine: partition the document by covering-annotation set.
//!
//! A segment is the derived unit the rendering layer consumes: a minimal
//! sub-range of the document over which the set of covering annotations is
//! constant. Segmentation is the standard sweep over interval endpoints
//! ("coordinate compression"): collect every annotation start/end plus the
//! document edges, sort, dedupe, and emit one segment per consecutive
//! boundary pair.
//!
//! Segments are never stored. The document is a single uploaded file and the
//! annotation set is human-sized, so full recomputation per read is the
//! deliberate choice over incremental maintenance.

use crate::annotation::Annotation;
use serde::{Deserialize, Serialize};

/// A minimal document sub-range with a constant covering-annotation set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// The covered text.
    pub text: String,
    /// Every annotation fully covering this range, in `(start, end)` order.
    pub annotations: Vec<Annotation>,
}

/// How the rendering layer should paint a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderDepth {
    /// No covering annotation: plain text.
    Plain,
    /// One covering annotation: flat label color.
    Single,
    /// Two covering annotations: two-color gradient.
    Stacked,
}

impl Segment {
    /// Classify this segment for rendering by covering-annotation count.
    #[must_use]
    pub fn render_depth(&self) -> RenderDepth {
        match self.annotations.len() {
            0 => RenderDepth::Plain,
            1 => RenderDepth::Single,
            _ => RenderDepth::Stacked,
        }
    }
}

/// Partition `doc` into the minimal ordered sequence of segments such that
/// every segment has a constant covering-annotation set.
///
/// Pure and deterministic: equal inputs yield byte-identical output. The
/// result covers `[0, doc.len())` exactly, with segments contiguous and
/// ordered by start. Boundaries that fall inside a multi-byte character are
/// skipped so the function is total over arbitrary annotation offsets; spans
/// created through the session always sit on `char` boundaries.
#[must_use]
pub fn segment(doc: &str, annotations: &[Annotation]) -> Vec<Segment> {
    if doc.is_empty() {
        return Vec::new();
    }

    // Stable (start, end) order makes segment-annotation ordering
    // deterministic when several spans share a start.
    let mut sorted: Vec<&Annotation> = annotations.iter().collect();
    sorted.sort_by_key(|a| (a.start, a.end));

    let mut boundaries: Vec<usize> = Vec::with_capacity(2 + annotations.len() * 2);
    boundaries.push(0);
    boundaries.push(doc.len());
    for ann in &sorted {
        boundaries.push(ann.start.min(doc.len()));
        boundaries.push(ann.end.min(doc.len()));
    }
    boundaries.sort_unstable();
    boundaries.dedup();
    boundaries.retain(|&b| doc.is_char_boundary(b));

    let mut segments = Vec::with_capacity(boundaries.len() - 1);
    for pair in boundaries.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let covering = sorted
            .iter()
            .filter(|a| a.covers(start, end))
            .map(|a| (*a).clone())
            .collect();
        segments.push(Segment {
            start,
            end,
            text: doc[start..end].to_string(),
            annotations: covering,
        });
    }
    segments
}
