//! Session state and the single mutation path.
//!
//! All authoritative state for one annotation session lives here: the
//! immutable document, the annotation and relation collections, attached
//! metadata, the label registry, and the undo/redo history. Rendering
//! layers hold no copies; they read segments and relation lists on demand
//! and send intents back as [`Command`]s.
//!
//! Every annotation/relation mutation flows through [`Session::apply`],
//! which validates first, snapshots history second, and mutates last; a
//! rejected command leaves the session untouched. Metadata edits bypass
//! history on purpose.

use crate::annotation::{snap_to_word_boundaries, Annotation, AnnotationId, Metadata};
use crate::error::{Error, Result};
use crate::history::History;
use crate::label::{LabelId, LabelRegistry};
use crate::relation::{ApplicatorChoice, Polarity, Relation, RelationId, RelationKind};
use crate::segment::{segment, Segment};
use serde::{Deserialize, Serialize};

/// The compound state captured per history entry.
///
/// Annotations and relations are snapshotted together so an undo never
/// resurrects a relation without the annotations it pointed at (or vice
/// versa).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Annotation set at snapshot time.
    pub annotations: Vec<Annotation>,
    /// Relation set at snapshot time.
    pub relations: Vec<Relation>,
}

/// A discrete mutation intent against the session.
///
/// Expressing mutations as data keeps history handling in one place
/// instead of each call-site remembering to snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Create an annotation over `[start, end)` with the given label.
    AddAnnotation {
        /// Start byte offset (inclusive), on a `char` boundary.
        start: usize,
        /// End byte offset (exclusive), on a `char` boundary.
        end: usize,
        /// Label to mark the span with.
        label_id: LabelId,
    },
    /// Remove one annotation by id.
    RemoveAnnotation {
        /// Id of the annotation to remove.
        id: AnnotationId,
    },
    /// Remove several annotations at once (the "remove all" menu action).
    RemoveAnnotations {
        /// Ids of the annotations to remove; ids that no longer exist are
        /// skipped.
        ids: Vec<AnnotationId>,
    },
    /// Create a relation rooted at `source`.
    AddRelation {
        /// The annotation the relation is rooted at.
        source: AnnotationId,
        /// What the relation asserts.
        kind: RelationKind,
    },
    /// Remove one relation by id.
    RemoveRelation {
        /// Id of the relation to remove.
        id: RelationId,
    },
}

/// Simple per-session counters shown in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of live annotations.
    pub annotations: usize,
    /// Document length in characters.
    pub characters: usize,
    /// Whitespace-separated word count of the trimmed document.
    pub words: usize,
}

/// Authoritative state for one annotation session.
#[derive(Debug, Clone)]
pub struct Session {
    document: String,
    project_name: String,
    annotator: String,
    labels: LabelRegistry,
    selected_label: Option<LabelId>,
    annotations: Vec<Annotation>,
    relations: Vec<Relation>,
    metadata: Vec<Metadata>,
    history: History<Snapshot>,
    next_annotation_id: AnnotationId,
    next_relation_id: RelationId,
    next_metadata_id: u64,
}

impl Session {
    /// Start a session over `document` for the given annotator.
    ///
    /// Initials are normalized to uppercase and truncated to three
    /// characters; blank initials are refused, mirroring the upload gate in
    /// the UI this engine backs.
    pub fn new(document: impl Into<String>, annotator: &str) -> Result<Self> {
        let initials: String = annotator.trim().chars().take(3).collect();
        if initials.is_empty() {
            return Err(Error::MissingAnnotator);
        }
        Ok(Self {
            document: document.into(),
            project_name: "New Project".to_string(),
            annotator: initials.to_uppercase(),
            labels: LabelRegistry::with_default_labels(),
            selected_label: None,
            annotations: Vec::new(),
            relations: Vec::new(),
            metadata: Vec::new(),
            history: History::new(),
            next_annotation_id: 1,
            next_relation_id: 1,
            next_metadata_id: 1,
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The session document (immutable after load).
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    /// The normalized annotator initials.
    #[must_use]
    pub fn annotator(&self) -> &str {
        &self.annotator
    }

    /// The project name.
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Rename the project. Not part of undo history.
    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.project_name = name.into();
    }

    /// The label registry.
    #[must_use]
    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }

    /// Mutable access to the label registry (label edits are not undoable).
    pub fn labels_mut(&mut self) -> &mut LabelRegistry {
        &mut self.labels
    }

    /// Live annotations in creation order.
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Stored relations in creation order, orphans included.
    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Look up a live annotation by id.
    #[must_use]
    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// The currently selected label, if any.
    #[must_use]
    pub fn selected_label(&self) -> Option<LabelId> {
        self.selected_label
    }

    // ------------------------------------------------------------------
    // Label selection
    // ------------------------------------------------------------------

    /// Select a label by id, or deselect when it is already active.
    pub fn toggle_label(&mut self, id: LabelId) -> Result<()> {
        if self.labels.by_id(id).is_none() {
            return Err(Error::UnknownLabel(id));
        }
        self.selected_label = if self.selected_label == Some(id) {
            None
        } else {
            Some(id)
        };
        Ok(())
    }

    /// Select a label by keyboard index (1-9), with the same toggle
    /// semantics. Out-of-range indices are ignored.
    pub fn toggle_label_by_index(&mut self, index: u8) {
        if let Some(label) = self.labels.by_index(index) {
            let id = label.id;
            // Registry lookups never fail for ids it just handed out.
            let _ = self.toggle_label(id);
        }
    }

    /// Clear the label selection.
    pub fn clear_label_selection(&mut self) {
        self.selected_label = None;
    }

    // ------------------------------------------------------------------
    // Selection path
    // ------------------------------------------------------------------

    /// Turn a raw text selection into an annotation with the selected label.
    ///
    /// The selection is widened to word boundaries first; selections that
    /// snap to nothing are silently dropped (`Ok(None)`, no history entry).
    /// Requires an active label.
    pub fn annotate_selection(
        &mut self,
        raw_start: usize,
        raw_end: usize,
    ) -> Result<Option<AnnotationId>> {
        let label_id = self.selected_label.ok_or(Error::NoLabelSelected)?;
        let Some((start, end)) = snap_to_word_boundaries(&self.document, raw_start, raw_end)
        else {
            return Ok(None);
        };
        let id = self.apply(Command::AddAnnotation {
            start,
            end,
            label_id,
        })?;
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Command application
    // ------------------------------------------------------------------

    /// Apply a mutation command.
    ///
    /// Validates fully before touching anything: a rejected command pushes
    /// no history and changes no state. On success, `Add*` commands return
    /// the created id.
    pub fn apply(&mut self, command: Command) -> Result<Option<u64>> {
        match command {
            Command::AddAnnotation {
                start,
                end,
                label_id,
            } => self.add_annotation(start, end, label_id).map(Some),
            Command::RemoveAnnotation { id } => {
                if self.annotation(id).is_none() {
                    return Err(Error::UnknownAnnotation(id));
                }
                self.checkpoint();
                self.annotations.retain(|a| a.id != id);
                Ok(None)
            }
            Command::RemoveAnnotations { ids } => {
                if !ids.iter().any(|id| self.annotation(*id).is_some()) {
                    // Nothing to do; avoid a no-op history entry.
                    return Ok(None);
                }
                self.checkpoint();
                self.annotations.retain(|a| !ids.contains(&a.id));
                Ok(None)
            }
            Command::AddRelation { source, kind } => {
                self.add_relation(source, kind).map(Some)
            }
            Command::RemoveRelation { id } => {
                if !self.relations.iter().any(|r| r.id == id) {
                    return Err(Error::UnknownRelation(id));
                }
                self.checkpoint();
                self.relations.retain(|r| r.id != id);
                Ok(None)
            }
        }
    }

    fn add_annotation(
        &mut self,
        start: usize,
        end: usize,
        label_id: LabelId,
    ) -> Result<u64> {
        if start >= end
            || end > self.document.len()
            || !self.document.is_char_boundary(start)
            || !self.document.is_char_boundary(end)
        {
            return Err(Error::invalid_input(format!(
                "span [{start}, {end}) is not a valid range of the document"
            )));
        }
        if self.labels.by_id(label_id).is_none() {
            return Err(Error::UnknownLabel(label_id));
        }
        let existing = self
            .annotations
            .iter()
            .filter(|a| a.overlaps_range(start, end))
            .count();
        if existing >= 2 {
            log::warn!(
                "rejecting span [{start}, {end}): {existing} annotations already stacked there"
            );
            return Err(Error::OverlapLimitExceeded {
                start,
                end,
                existing,
            });
        }

        self.checkpoint();
        let id = self.next_annotation_id;
        self.next_annotation_id += 1;
        self.annotations.push(Annotation {
            id,
            start,
            end,
            text: self.document[start..end].to_string(),
            label_id,
            annotator: self.annotator.clone(),
        });
        Ok(id)
    }

    fn add_relation(&mut self, source: AnnotationId, kind: RelationKind) -> Result<u64> {
        if self.annotation(source).is_none() {
            return Err(Error::UnknownAnnotation(source));
        }
        if let RelationKind::Factor { target, .. } = kind {
            if target == source {
                return Err(Error::SelfRelation(source));
            }
            if self.annotation(target).is_none() {
                return Err(Error::UnknownAnnotation(target));
            }
        }

        self.checkpoint();
        let id = self.next_relation_id;
        self.next_relation_id += 1;
        self.relations.push(Relation { id, source, kind });
        Ok(id)
    }

    /// Root an applicator relation at `source`.
    pub fn relate_applicator(
        &mut self,
        source: AnnotationId,
        choice: ApplicatorChoice,
    ) -> Result<RelationId> {
        let id = self.apply(Command::AddRelation {
            source,
            kind: RelationKind::Applicator(choice),
        })?;
        Ok(id.unwrap_or_default())
    }

    /// Link `source` to `target` as a supporting or limiting factor.
    pub fn relate_factor(
        &mut self,
        source: AnnotationId,
        target: AnnotationId,
        polarity: Polarity,
    ) -> Result<RelationId> {
        let id = self.apply(Command::AddRelation {
            source,
            kind: RelationKind::Factor { polarity, target },
        })?;
        Ok(id.unwrap_or_default())
    }

    // ------------------------------------------------------------------
    // Relation queries
    // ------------------------------------------------------------------

    /// Every relation incident on `id` as source or factor target.
    ///
    /// Deleting an annotation does not cascade here; orphaned relations are
    /// simply no longer reachable through any live annotation id.
    #[must_use]
    pub fn relations_of(&self, id: AnnotationId) -> Vec<&Relation> {
        self.relations.iter().filter(|r| r.touches(id)).collect()
    }

    // ------------------------------------------------------------------
    // Metadata (deliberately outside undo history)
    // ------------------------------------------------------------------

    /// Attach a key/value pair to a live annotation. Keys may repeat.
    pub fn add_metadata(
        &mut self,
        annotation_id: AnnotationId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<u64> {
        if self.annotation(annotation_id).is_none() {
            return Err(Error::UnknownAnnotation(annotation_id));
        }
        let id = self.next_metadata_id;
        self.next_metadata_id += 1;
        self.metadata.push(Metadata {
            id,
            annotation_id,
            key: key.into(),
            value: value.into(),
        });
        Ok(id)
    }

    /// Remove a metadata entry by id.
    pub fn remove_metadata(&mut self, id: u64) -> Result<()> {
        let before = self.metadata.len();
        self.metadata.retain(|m| m.id != id);
        if self.metadata.len() == before {
            return Err(Error::invalid_input(format!("unknown metadata id: {id}")));
        }
        Ok(())
    }

    /// Metadata entries attached to an annotation, in insertion order.
    #[must_use]
    pub fn metadata_of(&self, annotation_id: AnnotationId) -> Vec<&Metadata> {
        self.metadata
            .iter()
            .filter(|m| m.annotation_id == annotation_id)
            .collect()
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            annotations: self.annotations.clone(),
            relations: self.relations.clone(),
        }
    }

    fn checkpoint(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(&snapshot);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.annotations = snapshot.annotations;
        self.relations = snapshot.relations;
    }

    /// Undo the most recent annotation/relation mutation. Returns whether
    /// anything changed.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(&current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    /// Redo the most recently undone mutation. Returns whether anything
    /// changed.
    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(&current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// The current segment partition of the document (recomputed per call).
    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        segment(&self.document, &self.annotations)
    }

    /// Sidebar counters.
    #[must_use]
    pub fn stats(&self) -> Stats {
        let trimmed = self.document.trim();
        Stats {
            annotations: self.annotations.len(),
            characters: self.document.chars().count(),
            words: if trimmed.is_empty() {
                0
            } else {
                trimmed.split_whitespace().count()
            },
        }
    }
}
