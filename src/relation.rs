//! Typed, directed relations between annotations.
//!
//! The export wire shape overloads two string fields (`type`/`value`); in
//! memory the invalid combinations are unrepresentable: a relation is either
//! an applicator choice attached to one annotation, or a factor link with a
//! polarity and a target. The wire strings are derived on demand.

use crate::annotation::AnnotationId;
use serde::{Deserialize, Serialize};

/// Identifier for a relation.
pub type RelationId = u64;

/// Controlled vocabulary for applicator relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicatorChoice {
    /// Tandem and ovoid applicator.
    TandO,
    /// Interstitial applicator.
    Is,
    /// Hybrid applicator.
    Hybrid,
}

impl ApplicatorChoice {
    /// The wire token for this choice.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicatorChoice::TandO => "T&O",
            ApplicatorChoice::Is => "IS",
            ApplicatorChoice::Hybrid => "Hybrid",
        }
    }

    /// Parse a wire token.
    #[must_use]
    pub fn from_str_token(token: &str) -> Option<Self> {
        match token {
            "T&O" => Some(ApplicatorChoice::TandO),
            "IS" => Some(ApplicatorChoice::Is),
            "Hybrid" => Some(ApplicatorChoice::Hybrid),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApplicatorChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a factor link relative to the chosen approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// The source supports the linked decision.
    Supports,
    /// The source limits or complicates the linked decision.
    Limits,
}

impl Polarity {
    /// The wire token for this polarity (`type` and `value` both carry it).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Supports => "supports",
            Polarity::Limits => "limits",
        }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a relation asserts about its source annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationKind {
    /// The source is delivered with a particular applicator; terminates in
    /// the choice itself, not another annotation.
    Applicator(ApplicatorChoice),
    /// The source supports or limits another annotation.
    Factor {
        /// Which way the link points the factor.
        polarity: Polarity,
        /// The annotation the factor is linked to.
        target: AnnotationId,
    },
}

/// A directed, typed edge rooted at a source annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Unique relation id.
    pub id: RelationId,
    /// The annotation the relation is rooted at.
    pub source: AnnotationId,
    /// What the relation asserts.
    pub kind: RelationKind,
}

impl Relation {
    /// The target annotation, if the relation links two annotations.
    #[must_use]
    pub fn target(&self) -> Option<AnnotationId> {
        match self.kind {
            RelationKind::Applicator(_) => None,
            RelationKind::Factor { target, .. } => Some(target),
        }
    }

    /// The wire `type` string for this relation.
    #[must_use]
    pub fn type_str(&self) -> &'static str {
        match self.kind {
            RelationKind::Applicator(_) => "applicator",
            RelationKind::Factor { polarity, .. } => polarity.as_str(),
        }
    }

    /// The wire `value` string: the applicator token, or the polarity token
    /// mirrored from the type.
    #[must_use]
    pub fn value_str(&self) -> &'static str {
        match self.kind {
            RelationKind::Applicator(choice) => choice.as_str(),
            RelationKind::Factor { polarity, .. } => polarity.as_str(),
        }
    }

    /// Whether this relation is incident on `id` as source or target.
    #[must_use]
    pub fn touches(&self, id: AnnotationId) -> bool {
        self.source == id || self.target() == Some(id)
    }
}
