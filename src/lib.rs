//! # tracemark
//!
//! Annotation overlay engine for reasoning-trace markup.
//!
//! A human annotator marks spans of a document with categorical labels,
//! links spans into a directed relation graph (supports/limits/applicator),
//! and exports the resulting decision chains for downstream analysis. This
//! crate is the engine behind that workflow:
//!
//! - **Segmentation**: partition the document into minimal disjoint
//!   segments tagged with the annotations covering each one
//! - **Overlap policy**: at most two annotations stacked over any offset
//! - **History**: linear undo/redo over the compound annotation+relation
//!   state
//! - **Relations**: typed edges between annotations, with decision chains
//!   derived at export time
//!
//! Text acquisition, rendering, and shortcut wiring are external
//! collaborators: they feed selections and commands in and consume
//! [`Segment`]s and exports out. The engine owns all authoritative state.
//!
//! ## Quick Start
//!
//! ```rust
//! use tracemark::{ExportDocument, Polarity, Session};
//!
//! # fn main() -> tracemark::Result<()> {
//! let mut session = Session::new("Dose was limited. We chose T&O.", "AB")?;
//!
//! session.toggle_label(1)?; // Factor_Pro
//! let factor = session.annotate_selection(0, 16)?.expect("non-empty");
//! session.toggle_label(4)?; // Decision
//! let decision = session.annotate_selection(18, 30)?.expect("non-empty");
//!
//! session.relate_factor(factor, decision, Polarity::Supports)?;
//!
//! let export = ExportDocument::from_session(&session);
//! assert_eq!(export.decision_chains.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Notes
//!
//! - Single-threaded and synchronous: all state belongs to one [`Session`]
//!   mutated by discrete user actions; there is nothing to lock.
//! - Segmentation is a pure function recomputed per read; documents are
//!   single uploaded files and annotation sets are human-sized.
//! - Mutations are [`Command`]s applied through one code path so history
//!   snapshots are uniform; rejected commands change nothing.

#![warn(missing_docs)]

pub mod annotation;
mod error;
pub mod export;
pub mod history;
pub mod label;
pub mod relation;
pub mod segment;
pub mod session;

pub use annotation::{snap_to_word_boundaries, Annotation, AnnotationId, Metadata};
pub use error::{Error, Result};
pub use export::{
    export_filename, AnnotationExport, ConnectedAnnotation, DecisionChain, ExportDocument,
    ExportMetadata, FactorEntry, RelationExport,
};
pub use history::History;
pub use label::{Label, LabelId, LabelRegistry, DECISION_LABEL, DEFAULT_LABELS, GUIDELINES};
pub use relation::{ApplicatorChoice, Polarity, Relation, RelationId, RelationKind};
pub use segment::{segment, RenderDepth, Segment};
pub use session::{Command, Session, Snapshot, Stats};

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use tracemark::prelude::*;
    //!
    //! let mut session = Session::new("some trace text", "AB").unwrap();
    //! session.toggle_label_by_index(1);
    //! session.annotate_selection(0, 4).unwrap();
    //! assert_eq!(session.stats().annotations, 1);
    //! ```
    pub use crate::annotation::{Annotation, AnnotationId, Metadata};
    pub use crate::error::{Error, Result};
    pub use crate::export::{export_filename, ExportDocument};
    pub use crate::label::{Label, LabelId, LabelRegistry};
    pub use crate::relation::{ApplicatorChoice, Polarity, Relation, RelationKind};
    pub use crate::segment::{segment, RenderDepth, Segment};
    pub use crate::session::{Command, Session, Stats};
}
