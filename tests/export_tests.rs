//! Export projector integration tests: decision chains, wire shape, and
//! context windows over a realistic session.

use chrono::{TimeZone, Utc};
use tracemark::{
    export_filename, ApplicatorChoice, Command, ExportDocument, Polarity, Session,
};

const DOC: &str = "Tumor geometry favored interstitial needles. \
                   Bladder dose constraints argued against extended dwell times. \
                   The team chose a hybrid applicator with two needles.";

fn timestamp() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 9, 30, 0).unwrap()
}

/// Factor_Pro + Factor_Con + Decision with both polarities and an
/// applicator choice.
fn annotated_session() -> (Session, u64, u64, u64) {
    let mut s = Session::new(DOC, "MK").unwrap();

    s.toggle_label(1).unwrap(); // Factor_Pro
    let pro = s.annotate_selection(0, 43).unwrap().unwrap();
    s.toggle_label(2).unwrap(); // Factor_Con
    let con = s.annotate_selection(45, 104).unwrap().unwrap();
    s.toggle_label(4).unwrap(); // Decision
    let decision = s.annotate_selection(107, 157).unwrap().unwrap();

    s.relate_factor(pro, decision, Polarity::Supports).unwrap();
    s.relate_factor(con, decision, Polarity::Limits).unwrap();
    s.relate_applicator(decision, ApplicatorChoice::Hybrid)
        .unwrap();

    (s, pro, con, decision)
}

#[test]
fn decision_chain_partitions_factors_by_polarity() {
    let (s, pro, con, decision) = annotated_session();
    let export = ExportDocument::from_session_at(&s, timestamp());

    assert_eq!(export.decision_chains.len(), 1);
    let chain = &export.decision_chains[0];
    assert_eq!(chain.annotation_id, decision);
    assert_eq!(chain.supporting_factors.len(), 1);
    assert_eq!(chain.supporting_factors[0].annotation_id, pro);
    assert_eq!(chain.supporting_factors[0].label, "Factor_Pro");
    assert_eq!(chain.limiting_factors.len(), 1);
    assert_eq!(chain.limiting_factors[0].annotation_id, con);
    assert_eq!(chain.applicator_choices, vec!["Hybrid"]);
}

#[test]
fn context_window_preserves_surrounding_text() {
    let (s, pro, _, _) = annotated_session();
    let export = ExportDocument::from_session_at(&s, timestamp());
    let chain = &export.decision_chains[0];

    let entry = &chain.supporting_factors[0];
    assert_eq!(entry.annotation_id, pro);
    // The factor sits at the document head; its window starts there and
    // runs into the following sentence.
    assert!(entry.context.starts_with("Tumor geometry"));
    assert!(entry.context.len() > entry.text.len());
    assert!(entry.context.contains(&entry.text));

    // The decision window reaches back into the preceding text.
    assert!(chain.context.contains("argued against"));
    assert!(chain.context.contains(&chain.text));
}

#[test]
fn flat_listing_covers_every_annotation() {
    let (s, pro, con, decision) = annotated_session();
    let export = ExportDocument::from_session_at(&s, timestamp());

    assert_eq!(export.annotations.len(), 3);
    for id in [pro, con, decision] {
        assert!(export.annotations.iter().any(|a| a.id == id));
    }
    // The decision sees all three incident relations.
    let entry = export.annotations.iter().find(|a| a.id == decision).unwrap();
    assert_eq!(entry.relations.len(), 3);
}

#[test]
fn export_metadata_and_filename() {
    let (mut s, ..) = annotated_session();
    s.set_project_name("Hybrid Applicator Review");
    let export = ExportDocument::from_session_at(&s, timestamp());

    assert_eq!(export.metadata.project_name, "Hybrid Applicator Review");
    assert_eq!(export.metadata.annotator, "MK");
    assert_eq!(export.metadata.timestamp, "2025-06-15T09:30:00Z");
    assert_eq!(
        export_filename(s.project_name()),
        "hybrid-applicator-review-annotations.json"
    );
}

#[test]
fn export_survives_orphaned_relations() {
    let (mut s, pro, _, decision) = annotated_session();
    s.apply(Command::RemoveAnnotation { id: pro }).unwrap();

    let export = ExportDocument::from_session_at(&s, timestamp());
    let chain = &export.decision_chains[0];
    // The supports relation dangles; it must vanish from the chain without
    // breaking anything else.
    assert!(chain.supporting_factors.is_empty());
    assert_eq!(chain.limiting_factors.len(), 1);
    assert_eq!(chain.applicator_choices, vec!["Hybrid"]);
    assert_eq!(export.annotations.len(), 2);
    let _ = decision;
}

#[test]
fn repeated_export_is_byte_identical() {
    let (s, ..) = annotated_session();
    let a = ExportDocument::from_session_at(&s, timestamp())
        .to_json()
        .unwrap();
    let b = ExportDocument::from_session_at(&s, timestamp())
        .to_json()
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn json_round_trips_through_serde() {
    let (s, ..) = annotated_session();
    let export = ExportDocument::from_session_at(&s, timestamp());
    let json = export.to_json().unwrap();
    let back: ExportDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(export, back);
}

#[test]
fn sessions_without_decisions_export_empty_chains() {
    let mut s = Session::new(DOC, "MK").unwrap();
    s.toggle_label(1).unwrap();
    s.annotate_selection(0, 14).unwrap().unwrap();

    let export = ExportDocument::from_session_at(&s, timestamp());
    assert!(export.decision_chains.is_empty());
    assert_eq!(export.annotations.len(), 1);
    assert!(export.annotations[0].relations.is_empty());
}
