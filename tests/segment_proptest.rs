//! Property-based tests for segmentation invariants.
//!
//! These verify the partition laws for ALL inputs reachable through the
//! session's accepted-mutation path, not just hand-picked examples.

use proptest::prelude::*;
use tracemark::{segment, Session};

const DOC: &str = "the quick brown fox jumps over the lazy dog and naps";

fn session_with(selections: &[(usize, usize)]) -> Session {
    let mut s = Session::new(DOC, "AB").unwrap();
    s.toggle_label(1).unwrap();
    for (a, b) in selections {
        let (lo, hi) = if a <= b { (*a, *b) } else { (*b, *a) };
        // Overlap rejections and empty snaps are part of the input space.
        let _ = s.annotate_selection(lo, hi);
    }
    s
}

proptest! {
    #[test]
    fn partition_covers_document_exactly(
        selections in prop::collection::vec((0usize..52, 0usize..52), 0..20),
    ) {
        let s = session_with(&selections);
        let segments = s.segments();

        let mut cursor = 0;
        for seg in &segments {
            prop_assert_eq!(seg.start, cursor);
            prop_assert!(seg.end > seg.start);
            prop_assert_eq!(seg.text.as_str(), &DOC[seg.start..seg.end]);
            cursor = seg.end;
        }
        prop_assert_eq!(cursor, DOC.len());
    }

    #[test]
    fn segmentation_is_deterministic(
        selections in prop::collection::vec((0usize..52, 0usize..52), 0..20),
    ) {
        let s = session_with(&selections);
        prop_assert_eq!(
            segment(s.document(), s.annotations()),
            segment(s.document(), s.annotations())
        );
    }

    #[test]
    fn new_annotation_only_subdivides(
        selections in prop::collection::vec((0usize..52, 0usize..52), 0..10),
        extra in (0usize..52, 0usize..52),
    ) {
        let mut s = session_with(&selections);
        let before: Vec<usize> = s.segments().iter().map(|seg| seg.start).collect();

        let (lo, hi) = if extra.0 <= extra.1 { (extra.0, extra.1) } else { (extra.1, extra.0) };
        if s.annotate_selection(lo, hi).ok().flatten().is_some() {
            let after: Vec<usize> = s.segments().iter().map(|seg| seg.start).collect();
            // Every old boundary survives: segments split, never merge.
            for boundary in before {
                prop_assert!(after.contains(&boundary));
            }
        }
    }

    #[test]
    fn overlap_cap_bounds_segment_depth(
        selections in prop::collection::vec((0usize..52, 0usize..52), 0..25),
    ) {
        let s = session_with(&selections);
        for seg in s.segments() {
            prop_assert!(
                seg.annotations.len() <= 2,
                "segment [{}, {}) covered by {} annotations",
                seg.start,
                seg.end,
                seg.annotations.len()
            );
        }
    }
}
