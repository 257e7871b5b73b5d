//! Snapshot-based linear undo/redo.
//!
//! The undo stack always holds the live state on top; its first entry is the
//! initial state and is never popped. Restoring a snapshot happens in two
//! steps so the caller can parse it before the stacks move.

/// Steady or transient state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryState {
    #[default]
    Recording,
    /// A snapshot is being applied; saves are ignored.
    Restoring,
}

/// Undo/redo stacks of serialized scene snapshots.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
    limit: usize,
    state: HistoryState,
}

impl History {
    /// Create a history seeded with the initial snapshot.
    pub fn new(initial: String, limit: usize) -> Self {
        Self {
            undo_stack: vec![initial],
            redo_stack: Vec::new(),
            limit: limit.max(1),
            state: HistoryState::Recording,
        }
    }

    /// Record a snapshot. Returns whether the stacks changed.
    pub fn save_state(&mut self, snapshot: String) -> bool {
        if self.state == HistoryState::Restoring {
            return false;
        }
        if self.undo_stack.last() == Some(&snapshot) {
            return false;
        }
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.limit {
            let excess = self.undo_stack.len() - self.limit;
            self.undo_stack.drain(..excess);
        }
        self.redo_stack.clear();
        true
    }

    /// Snapshot an undo would restore, without changing anything.
    pub fn undo_target(&self) -> Option<&str> {
        if self.undo_stack.len() < 2 {
            return None;
        }
        self.undo_stack
            .get(self.undo_stack.len() - 2)
            .map(String::as_str)
    }

    /// Snapshot a redo would restore, without changing anything.
    pub fn redo_target(&self) -> Option<&str> {
        self.redo_stack.last().map(String::as_str)
    }

    /// Move the live snapshot onto the redo stack. Returns the new live snapshot.
    pub fn commit_undo(&mut self) -> Option<&str> {
        if self.undo_stack.len() < 2 {
            return None;
        }
        let current = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        self.undo_stack.last().map(String::as_str)
    }

    /// Move the newest redo snapshot back onto the undo stack.
    pub fn commit_redo(&mut self) -> Option<&str> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(next);
        self.undo_stack.last().map(String::as_str)
    }

    /// Enter the guarded restoring state.
    pub fn begin_restore(&mut self) {
        self.state = HistoryState::Restoring;
    }

    /// Return to recording.
    pub fn end_restore(&mut self) {
        self.state = HistoryState::Recording;
    }

    pub fn state(&self) -> HistoryState {
        self.state
    }

    pub fn is_restoring(&self) -> bool {
        self.state == HistoryState::Restoring
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// The live snapshot.
    pub fn current(&self) -> Option<&str> {
        self.undo_stack.last().map(String::as_str)
    }

    /// Drop all history and start over from `initial`.
    pub fn clear(&mut self, initial: String) {
        self.undo_stack.clear();
        self.undo_stack.push(initial);
        self.redo_stack.clear();
        self.state = HistoryState::Recording;
    }
}
