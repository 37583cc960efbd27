//! Error types for tracemark.

use thiserror::Error;

/// Result type for tracemark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for tracemark operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A candidate span already has two annotations stacked on part of it.
    ///
    /// At most two annotations may cover any offset; the third is refused
    /// so the rendering layer never has to blend more than two colors.
    #[error("span [{start}, {end}) already overlaps {existing} annotations (limit 2)")]
    OverlapLimitExceeded {
        /// Snapped start offset of the rejected selection.
        start: usize,
        /// Snapped end offset of the rejected selection.
        end: usize,
        /// Number of existing annotations overlapping the selection.
        existing: usize,
    },

    /// No label is selected; annotation requires an active label.
    #[error("no label selected")]
    NoLabelSelected,

    /// Annotator initials are blank; annotation and file load require them.
    #[error("annotator initials are required")]
    MissingAnnotator,

    /// A label with this name already exists.
    #[error("duplicate label name: {0}")]
    DuplicateLabel(String),

    /// Label id does not resolve to a registered label.
    #[error("unknown label id: {0}")]
    UnknownLabel(u32),

    /// Annotation id does not resolve to a live annotation.
    #[error("unknown annotation id: {0}")]
    UnknownAnnotation(u64),

    /// Relation id does not resolve to a stored relation.
    #[error("unknown relation id: {0}")]
    UnknownRelation(u64),

    /// A factor link may not point an annotation at itself.
    #[error("relation source and target are the same annotation: {0}")]
    SelfRelation(u64),

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Export serialization failed.
    #[error("export error: {0}")]
    Export(String),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create an export error.
    pub fn export(msg: impl Into<String>) -> Self {
        Error::Export(msg.into())
    }
}
