//! Export projector: session state to a serializable decision-chain
//! document.
//!
//! The projection is read-only. It produces a flat per-annotation relation
//! listing plus, for every annotation labeled `Decision`, a decision chain
//! grouping the connected supporting/limiting factors and applicator
//! choices. Factor and decision entries carry a context window of
//! surrounding document text, since the extracted substring alone loses the
//! reading context.
//!
//! Relations whose annotations were deleted earlier in the session are
//! still stored; the projector filters them defensively, rendering missing
//! endpoints as `null` rather than failing.

use crate::annotation::{Annotation, AnnotationId};
use crate::error::{Error, Result};
use crate::label::DECISION_LABEL;
use crate::relation::{Relation, RelationKind};
use crate::session::Session;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Characters of surrounding text captured on each side of a span.
const CONTEXT_CHARS: usize = 100;

/// Top-level export metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Project name at export time.
    #[serde(rename = "projectName")]
    pub project_name: String,
    /// Annotator initials.
    pub annotator: String,
    /// Export timestamp, RFC 3339 / ISO-8601.
    pub timestamp: String,
}

/// The annotation on the far end of a factor relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedAnnotation {
    /// Text of the connected annotation.
    pub text: String,
    /// Label name of the connected annotation.
    #[serde(rename = "type")]
    pub label: String,
}

/// One relation as seen from a particular annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationExport {
    /// Relation type token (`applicator`, `supports`, `limits`).
    #[serde(rename = "type")]
    pub relation_type: String,
    /// Relation value token (applicator choice, or the polarity mirrored).
    pub value: String,
    /// The annotation on the other end, when the relation links two
    /// annotations and the other end still exists.
    pub connected_annotation: Option<ConnectedAnnotation>,
}

/// Flat export entry for one annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationExport {
    /// Annotation id.
    pub id: AnnotationId,
    /// Annotated text.
    pub text: String,
    /// Label name.
    #[serde(rename = "type")]
    pub label: String,
    /// Every relation incident on this annotation.
    pub relations: Vec<RelationExport>,
}

/// A factor or decision span with its reading context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorEntry {
    /// Annotation id of the factor.
    pub annotation_id: AnnotationId,
    /// Annotated text.
    pub text: String,
    /// Label name.
    #[serde(rename = "type")]
    pub label: String,
    /// Surrounding document text (up to 100 characters each side).
    pub context: String,
}

/// A Decision annotation grouped with its connected factors and choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionChain {
    /// Annotation id of the decision.
    pub annotation_id: AnnotationId,
    /// Decision text.
    pub text: String,
    /// Surrounding document text for the decision span.
    pub context: String,
    /// Connected annotations linked with `supports` polarity.
    pub supporting_factors: Vec<FactorEntry>,
    /// Connected annotations linked with `limits` polarity.
    pub limiting_factors: Vec<FactorEntry>,
    /// Applicator choices recorded against the decision.
    pub applicator_choices: Vec<String>,
}

/// The complete export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Project/annotator/timestamp header.
    pub metadata: ExportMetadata,
    /// Flat per-annotation relation listing.
    pub annotations: Vec<AnnotationExport>,
    /// Decision chains for every Decision-labeled annotation.
    pub decision_chains: Vec<DecisionChain>,
}

impl ExportDocument {
    /// Project the current session state, stamped with the current time.
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self::from_session_at(session, Utc::now())
    }

    /// Project the current session state with an explicit timestamp.
    #[must_use]
    pub fn from_session_at(session: &Session, timestamp: DateTime<Utc>) -> Self {
        let annotations = session
            .annotations()
            .iter()
            .map(|ann| AnnotationExport {
                id: ann.id,
                text: ann.text.clone(),
                label: label_name(session, ann),
                relations: session
                    .relations_of(ann.id)
                    .into_iter()
                    .map(|rel| relation_export(session, rel, ann.id))
                    .collect(),
            })
            .collect();

        let decision_chains: Vec<DecisionChain> = session
            .annotations()
            .iter()
            .filter(|ann| label_name(session, ann) == DECISION_LABEL)
            .map(|decision| build_chain(session, decision))
            .collect();

        log::info!(
            "export: {} annotations, {} decision chains",
            session.annotations().len(),
            decision_chains.len()
        );

        Self {
            metadata: ExportMetadata {
                project_name: session.project_name().to_string(),
                annotator: session.annotator().to_string(),
                timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            },
            annotations,
            decision_chains,
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::export(e.to_string()))
    }
}

/// Derive the export filename from a project name: lowercased, whitespace
/// runs collapsed to `-`, with the `-annotations.json` suffix.
#[must_use]
pub fn export_filename(project_name: &str) -> String {
    let slug: Vec<String> = project_name
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    format!("{}-annotations.json", slug.join("-"))
}

fn label_name(session: &Session, ann: &Annotation) -> String {
    session
        .labels()
        .name_of(ann.label_id)
        .unwrap_or("unknown")
        .to_string()
}

fn relation_export(session: &Session, rel: &Relation, viewed_from: AnnotationId) -> RelationExport {
    let connected = match rel.kind {
        RelationKind::Applicator(_) => None,
        RelationKind::Factor { target, .. } => {
            let other = if rel.source == viewed_from {
                target
            } else {
                rel.source
            };
            session.annotation(other).map(|ann| ConnectedAnnotation {
                text: ann.text.clone(),
                label: label_name(session, ann),
            })
        }
    };
    RelationExport {
        relation_type: rel.type_str().to_string(),
        value: rel.value_str().to_string(),
        connected_annotation: connected,
    }
}

fn build_chain(session: &Session, decision: &Annotation) -> DecisionChain {
    let mut supporting = Vec::new();
    let mut limiting = Vec::new();
    let mut choices = Vec::new();

    // One hop from the decision only; no traversal, so cycles in the
    // relation graph cannot loop here.
    for rel in session.relations_of(decision.id) {
        match rel.kind {
            RelationKind::Applicator(choice) => choices.push(choice.as_str().to_string()),
            RelationKind::Factor { polarity, target } => {
                let other = if rel.source == decision.id {
                    target
                } else {
                    rel.source
                };
                let Some(ann) = session.annotation(other) else {
                    continue; // dangling endpoint: skip, never fail
                };
                let entry = FactorEntry {
                    annotation_id: ann.id,
                    text: ann.text.clone(),
                    label: label_name(session, ann),
                    context: context_window(session.document(), ann.start, ann.end),
                };
                match polarity {
                    crate::relation::Polarity::Supports => supporting.push(entry),
                    crate::relation::Polarity::Limits => limiting.push(entry),
                }
            }
        }
    }

    DecisionChain {
        annotation_id: decision.id,
        text: decision.text.clone(),
        context: context_window(session.document(), decision.start, decision.end),
        supporting_factors: supporting,
        limiting_factors: limiting,
        applicator_choices: choices,
    }
}

/// Surrounding document text: up to [`CONTEXT_CHARS`] characters on each
/// side of `[start, end)`, clipped to document bounds.
fn context_window(doc: &str, start: usize, end: usize) -> String {
    let mut lo = start.min(doc.len());
    while lo > 0 && !doc.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = end.min(doc.len());
    while hi < doc.len() && !doc.is_char_boundary(hi) {
        hi += 1;
    }

    for _ in 0..CONTEXT_CHARS {
        match doc[..lo].chars().next_back() {
            Some(c) => lo -= c.len_utf8(),
            None => break,
        }
    }
    for _ in 0..CONTEXT_CHARS {
        match doc[hi..].chars().next() {
            Some(c) => hi += c.len_utf8(),
            None => break,
        }
    }
    doc[lo..hi].to_string()
}
