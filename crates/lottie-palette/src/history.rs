//! # History Engine
//!
//! Bounded undo/redo over full document snapshots.
//!
//! The top of the undo stack is the current document; the bottom is the
//! baseline captured at load (or reset) and is never popped by `undo`.

use serde_json::Value;
use std::collections::VecDeque;
use tracing::debug;

pub const MAX_HISTORY: usize = 60;

#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Value>,
    redo: Vec<Value>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Clears both stacks and makes `document` the new baseline.
    pub fn reset(&mut self, document: &Value) {
        self.undo.clear();
        self.redo.clear();
        self.undo.push_back(document.clone());
    }

    /// Records `document` unless it equals the current top.
    ///
    /// Returns whether a snapshot was pushed. A push clears the redo stack and
    /// drops the oldest entry once the stack is over capacity.
    pub fn snapshot(&mut self, document: &Value) -> bool {
        if self.undo.back() == Some(document) {
            return false;
        }
        self.push(document.clone());
        self.redo.clear();
        true
    }

    /// Steps back one snapshot, writing it into `document`.
    pub fn undo(&mut self, document: &mut Value) -> bool {
        if !self.can_undo() {
            return false;
        }
        let Some(current) = self.undo.pop_back() else {
            return false;
        };
        self.redo.push(current);
        if let Some(previous) = self.undo.back() {
            *document = previous.clone();
        }
        debug!(undo = self.undo.len(), redo = self.redo.len(), "undo");
        true
    }

    /// Re-applies the most recently undone snapshot.
    ///
    /// The restored snapshot is pushed onto the undo stack, not the document
    /// as it was before the redo, so the top still equals the live document
    /// and no duplicate of the pre-redo state is left behind.
    pub fn redo(&mut self, document: &mut Value) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        *document = next.clone();
        self.push(next);
        debug!(undo = self.undo.len(), redo = self.redo.len(), "redo");
        true
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn baseline(&self) -> Option<&Value> {
        self.undo.front()
    }

    /// Snapshots from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &Value> {
        self.undo.iter()
    }

    fn push(&mut self, snapshot: Value) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(n: usize) -> Value {
        json!({ "w": 512, "step": n })
    }

    #[test]
    fn test_duplicate_snapshot_is_ignored() {
        let mut history = History::new();
        history.reset(&state(0));
        assert!(!history.snapshot(&state(0)));
        assert!(history.snapshot(&state(1)));
        assert!(!history.snapshot(&state(1)));
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn test_duplicate_snapshot_keeps_redo() {
        let mut history = History::new();
        history.reset(&state(0));
        let mut document = state(1);
        history.snapshot(&document);
        assert!(history.undo(&mut document));

        assert!(!history.snapshot(&document));
        assert!(history.can_redo());
        assert!(history.redo(&mut document));
        assert_eq!(document, state(1));
    }

    #[test]
    fn test_capacity_keeps_most_recent() {
        let mut history = History::new();
        for n in 0..MAX_HISTORY + 10 {
            history.snapshot(&state(n));
        }
        assert_eq!(history.undo_len(), MAX_HISTORY);
        let steps: Vec<_> = history.entries().map(|v| v["step"].as_u64().unwrap()).collect();
        let expected: Vec<_> = (10..MAX_HISTORY as u64 + 10).collect();
        assert_eq!(steps, expected);
    }

    #[test]
    fn test_undo_stops_at_baseline() {
        let mut history = History::new();
        history.reset(&state(0));
        let mut document = state(0);
        for n in 1..=5 {
            document = state(n);
            history.snapshot(&document);
        }
        for _ in 0..20 {
            history.undo(&mut document);
        }
        assert_eq!(document, state(0));
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.baseline(), Some(&state(0)));
        assert!(!history.can_undo());
        assert!(!history.undo(&mut document));
    }

    #[test]
    fn test_redo_replays_and_new_push_clears_it() {
        let mut history = History::new();
        history.reset(&state(0));
        let mut document = state(2);
        history.snapshot(&state(1));
        history.snapshot(&document);

        assert!(history.undo(&mut document));
        assert!(history.undo(&mut document));
        assert_eq!(document, state(0));
        assert_eq!(history.redo_len(), 2);

        assert!(history.redo(&mut document));
        assert_eq!(document, state(1));
        assert!(history.undo(&mut document));
        assert_eq!(document, state(0));
        assert!(history.redo(&mut document));
        assert!(history.redo(&mut document));
        assert_eq!(document, state(2));
        assert!(!history.redo(&mut document));

        history.undo(&mut document);
        history.snapshot(&state(9));
        assert!(!history.can_redo());
    }
}
