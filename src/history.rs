//! Linear undo/redo over whole-state snapshots.
//!
//! Snapshots are full deep copies rather than diffs: memory grows with edit
//! count times state size, which is fine for human-scale sessions. Recording
//! a new snapshot clears the redo side, so no redo branch survives an edit.

/// A linear undo/redo stack over cloneable snapshots.
#[derive(Debug, Clone, Default)]
pub struct History<T: Clone> {
    past: Vec<T>,
    future: Vec<T>,
}

impl<T: Clone> History<T> {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
        }
    }

    /// Record the state as it is *before* a mutation and drop any redo
    /// branch. Call this once per mutating operation, before applying it.
    pub fn record(&mut self, current: &T) {
        self.past.push(current.clone());
        self.future.clear();
    }

    /// Step back: push `current` onto the redo side and return the most
    /// recent past state, or `None` when there is nothing to undo.
    #[must_use]
    pub fn undo(&mut self, current: &T) -> Option<T> {
        let previous = self.past.pop()?;
        self.future.push(current.clone());
        Some(previous)
    }

    /// Step forward: push `current` onto the undo side and return the most
    /// recently undone state, or `None` when there is nothing to redo.
    #[must_use]
    pub fn redo(&mut self, current: &T) -> Option<T> {
        let next = self.future.pop()?;
        self.past.push(current.clone());
        Some(next)
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of recorded past states.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.past.len()
    }
}
