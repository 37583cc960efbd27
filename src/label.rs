//! Labels and the label registry.
//!
//! Labels are the categorical vocabulary an annotator marks spans with.
//! The registry owns them for the session; annotations reference labels by
//! id only, so renaming the set does not touch existing spans.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Identifier for a label, stable for the session.
pub type LabelId = u32;

/// The seven default reasoning labels with their display colors.
///
/// Order matters: keyboard shortcuts 1-9 address labels by position.
pub const DEFAULT_LABELS: [(&str, &str); 7] = [
    ("Factor_Pro", "#4ade80"),
    ("Factor_Con", "#f87171"),
    ("Reasoning", "#f97316"),
    ("Decision", "#60a5fa"),
    ("Hypothetical", "#eab308"),
    ("Confidence", "#7e22ce"),
    ("Other_Comment", "#14b8a6"),
];

/// Short per-label annotation guidance, surfaced by the rendering layer.
pub const GUIDELINES: [(&str, &str); 7] = [
    ("Factor_Pro", "Supports the final chosen approach"),
    ("Factor_Con", "Argues against/complicates the final approach"),
    ("Reasoning", "Explains *why* certain factors lead to the choice"),
    ("Decision", "The final statement of what was chosen"),
    ("Hypothetical", "\"What if\" or alternative scenario"),
    ("Confidence", "Degree of certainty"),
    ("Other_Comment", "Everything else"),
];

/// The label name that anchors decision chains in the export.
pub const DECISION_LABEL: &str = "Decision";

/// A categorical label: name plus display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Session-stable identifier, assigned monotonically from 1.
    pub id: LabelId,
    /// Display name, unique among registered labels.
    pub name: String,
    /// Display color as a hex string (e.g. `#60a5fa`).
    pub color: String,
}

/// Ordered registry of labels for one session.
///
/// Ids are `position + 1` at registration time and never reused; lookups by
/// keyboard index (1-9) address the registration order directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRegistry {
    labels: Vec<Label>,
}

impl Default for LabelRegistry {
    fn default() -> Self {
        Self::with_default_labels()
    }
}

impl LabelRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { labels: Vec::new() }
    }

    /// Create a registry seeded with the seven default reasoning labels.
    #[must_use]
    pub fn with_default_labels() -> Self {
        let labels = DEFAULT_LABELS
            .iter()
            .enumerate()
            .map(|(index, (name, color))| Label {
                id: index as LabelId + 1,
                name: (*name).to_string(),
                color: (*color).to_string(),
            })
            .collect();
        Self { labels }
    }

    /// Register a new label. Names must be unique; ids are `count + 1`.
    pub fn add(&mut self, name: impl Into<String>, color: impl Into<String>) -> Result<LabelId> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_input("label name must not be blank"));
        }
        if self.labels.iter().any(|l| l.name == trimmed) {
            return Err(Error::DuplicateLabel(trimmed.to_string()));
        }
        let id = self.labels.len() as LabelId + 1;
        self.labels.push(Label {
            id,
            name: trimmed.to_string(),
            color: color.into(),
        });
        Ok(id)
    }

    /// Look up a label by id.
    #[must_use]
    pub fn by_id(&self, id: LabelId) -> Option<&Label> {
        self.labels.iter().find(|l| l.id == id)
    }

    /// Look up a label by keyboard index (1-9, registration order).
    #[must_use]
    pub fn by_index(&self, index: u8) -> Option<&Label> {
        if !(1..=9).contains(&index) {
            return None;
        }
        self.labels.get(index as usize - 1)
    }

    /// Resolve a label name by id, or `None` if the id is stale.
    #[must_use]
    pub fn name_of(&self, id: LabelId) -> Option<&str> {
        self.by_id(id).map(|l| l.name.as_str())
    }

    /// All labels in registration order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of registered labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
