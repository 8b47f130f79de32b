//! Linear undo/redo history over normalized editor states

use std::collections::VecDeque;
use std::fmt;

use super::state::{EditorState, IndentType};
use crate::config::runtime::HistoryPreferences;
use crate::indent;
use crate::logging::codes;
use crate::{log_debug, log_success, log_warning};

/// Snapshot kept on the undo or redo stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub state: EditorState,
    pub recorded_at_ms: u64,
}

/// The transition that last changed the history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Edit,
    StructuralEdit,
    Undo,
    Redo,
    CursorMove,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Edit => "edit",
            Transition::StructuralEdit => "structural_edit",
            Transition::Undo => "undo",
            Transition::Redo => "redo",
            Transition::CursorMove => "cursor_move",
        }
    }

    /// Whether this transition can change the text and needs a re-render
    pub fn changes_text(&self) -> bool {
        !matches!(self, Transition::CursorMove)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current state plus bounded undo and redo stacks
#[derive(Debug, Clone)]
pub struct EditHistory {
    current: HistoryEntry,
    undo: VecDeque<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    max_entries: usize,
    coalesce_window_ms: u64,
    /// Time of the last coalescible edit in the running burst
    burst_at: Option<u64>,
}

impl EditHistory {
    /// Start a history from an initial state; the state is normalized first
    pub fn new(initial: EditorState, preferences: &HistoryPreferences, now_ms: u64) -> Self {
        Self {
            current: HistoryEntry {
                state: indent::normalize(&initial),
                recorded_at_ms: now_ms,
            },
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_entries: preferences.max_entries.max(1),
            coalesce_window_ms: preferences.coalesce_window_ms,
            burst_at: None,
        }
    }

    pub fn current(&self) -> &EditorState {
        &self.current.state
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
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

    /// Commit a text-changing edit.
    ///
    /// `coalescible` edits that arrive within the coalesce window of the previous
    /// coalescible edit replace the current state instead of pushing an undo entry.
    /// An edit whose normalized text equals the current text only moves the cursor.
    pub fn edit(&mut self, state: EditorState, coalescible: bool, now_ms: u64) -> Transition {
        let normalized = indent::normalize(&state);

        if normalized.text == self.current.state.text {
            self.move_cursor(normalized.cursor_start, normalized.cursor_end);
            return Transition::CursorMove;
        }

        let in_burst = coalescible
            && self
                .burst_at
                .is_some_and(|at| now_ms.saturating_sub(at) <= self.coalesce_window_ms);

        let entry = HistoryEntry {
            state: normalized,
            recorded_at_ms: now_ms,
        };

        if in_burst {
            self.current = entry;
        } else {
            let previous = std::mem::replace(&mut self.current, entry);
            self.push_undo(previous);
        }

        self.redo.clear();
        self.burst_at = coalescible.then_some(now_ms);
        self.report(Transition::Edit);
        Transition::Edit
    }

    /// Commit an edit that re-derives the whole state (paste, cut, initialization)
    pub fn structural_edit(&mut self, state: EditorState, now_ms: u64) -> Transition {
        let state = state.with_indent(IndentType::Both);
        match self.edit(state, false, now_ms) {
            Transition::Edit => {
                self.report(Transition::StructuralEdit);
                Transition::StructuralEdit
            }
            other => other,
        }
    }

    /// Restore the previous state; `None` when there is nothing to undo
    pub fn undo(&mut self, now_ms: u64) -> Option<Transition> {
        let Some(previous) = self.undo.pop_back() else {
            log_warning!(code = codes::history::NOTHING_TO_UNDO, "Undo requested with empty history");
            return None;
        };

        let mut current = std::mem::replace(&mut self.current, previous);
        current.recorded_at_ms = now_ms;
        self.redo.push(current);
        self.burst_at = None;
        self.report(Transition::Undo);
        Some(Transition::Undo)
    }

    /// Re-apply the last undone state; `None` when there is nothing to redo
    pub fn redo(&mut self, now_ms: u64) -> Option<Transition> {
        let Some(next) = self.redo.pop() else {
            log_warning!(code = codes::history::NOTHING_TO_REDO, "Redo requested with empty redo stack");
            return None;
        };

        let mut current = std::mem::replace(&mut self.current, next);
        current.recorded_at_ms = now_ms;
        self.push_undo(current);
        self.burst_at = None;
        self.report(Transition::Redo);
        Some(Transition::Redo)
    }

    /// Update the cursor of the current state only; the stacks are untouched
    pub fn move_cursor(&mut self, start: usize, end: usize) {
        self.current.state.set_cursor(start, end);
        self.burst_at = None;
        log_debug!("Cursor moved",
            "start" => self.current.state.cursor_start,
            "end" => self.current.state.cursor_end
        );
    }

    fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo.push_back(entry);
        let mut dropped = 0;
        while self.undo.len() > self.max_entries {
            self.undo.pop_front();
            dropped += 1;
        }
        if dropped > 0 {
            log_warning!(code = codes::history::HISTORY_TRIMMED,
                "Oldest undo entries dropped",
                "dropped" => dropped,
                "max_entries" => self.max_entries
            );
        }
    }

    fn report(&self, transition: Transition) {
        log_success!(codes::success::HISTORY_TRANSITION_APPLIED,
            "History transition applied",
            "transition" => transition,
            "undo" => self.undo.len(),
            "redo" => self.redo.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preferences(window: u64, max_entries: usize) -> HistoryPreferences {
        HistoryPreferences {
            coalesce_window_ms: window,
            max_entries,
        }
    }

    fn history() -> EditHistory {
        EditHistory::new(EditorState::new("", 0, 0), &preferences(0, 100), 0)
    }

    fn typed(text: &str) -> EditorState {
        let len = text.chars().count();
        EditorState::new(text, len, len)
    }

    #[test]
    fn test_initial_state_is_normalized() {
        let history = EditHistory::new(
            EditorState::new("(a", 2, 2).with_indent(IndentType::Both),
            &preferences(0, 10),
            0,
        );
        assert_eq!(history.current().text, "(a)\n");
        assert!(!history.can_undo());
    }

    #[test]
    fn test_edit_pushes_previous_and_clears_redo() {
        let mut history = history();
        assert_eq!(history.edit(typed("a"), false, 10), Transition::Edit);
        assert_eq!(history.edit(typed("ab"), false, 20), Transition::Edit);
        assert_eq!(history.undo_len(), 2);

        history.undo(30);
        assert!(history.can_redo());
        history.edit(typed("x"), false, 40);
        assert!(!history.can_redo());
        assert_eq!(history.redo(50), None);
    }

    #[test]
    fn test_undo_then_redo_restores_state() {
        let mut history = history();
        history.edit(typed("(a)"), false, 1);
        history.edit(EditorState::new("(a b)", 4, 4), false, 2);
        let before = history.current().clone();

        assert_eq!(history.undo(3), Some(Transition::Undo));
        assert_eq!(history.current().text, "(a)\n");
        assert_eq!(history.redo(4), Some(Transition::Redo));
        assert_eq!(history.current(), &before);
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut history = history();
        let before = history.current().clone();
        assert_eq!(history.undo(1), None);
        assert_eq!(history.current(), &before);
    }

    #[test]
    fn test_coalescing_within_window() {
        let mut history = EditHistory::new(EditorState::new("", 0, 0), &preferences(300, 100), 0);
        history.edit(typed("a"), true, 1000);
        history.edit(typed("ab"), true, 1200);
        history.edit(typed("abc"), true, 1450);
        assert_eq!(history.undo_len(), 1);

        // past the window a new step starts
        history.edit(typed("abcd"), true, 2000);
        assert_eq!(history.undo_len(), 2);

        history.undo(2100);
        assert_eq!(history.current().text, "abc\n");
        history.undo(2200);
        assert_eq!(history.current().text, "\n");
    }

    #[test]
    fn test_non_coalescible_edit_breaks_burst() {
        let mut history = EditHistory::new(EditorState::new("", 0, 0), &preferences(300, 100), 0);
        history.edit(typed("a"), true, 10);
        history.edit(typed("a b"), false, 20);
        history.edit(typed("a bc"), true, 30);
        assert_eq!(history.undo_len(), 3);
    }

    #[test]
    fn test_cursor_move_keeps_stacks() {
        let mut history = history();
        history.edit(typed("abc"), false, 1);
        history.undo(2);
        history.redo(3);
        history.undo(4);
        let undo = history.undo_len();

        history.move_cursor(1, 1);
        assert_eq!(history.current().cursor_start, 1);
        assert_eq!(history.undo_len(), undo);
        assert!(history.can_redo());
    }

    #[test]
    fn test_unchanged_text_is_cursor_move() {
        let mut history = history();
        history.edit(typed("abc"), false, 1);
        let transition = history.edit(EditorState::new("abc\n", 1, 2), false, 2);
        assert_eq!(transition, Transition::CursorMove);
        assert_eq!(history.undo_len(), 1);
        assert_eq!((history.current().cursor_start, history.current().cursor_end), (1, 2));
    }

    #[test]
    fn test_structural_edit_closes_and_indents() {
        let mut history = history();
        let transition = history.structural_edit(EditorState::new("(do\nx", 5, 5), 1);
        assert_eq!(transition, Transition::StructuralEdit);
        assert_eq!(history.current().text, "(do\n  x)\n");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = EditHistory::new(EditorState::new("", 0, 0), &preferences(0, 3), 0);
        for (i, text) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            history.edit(typed(text), false, i as u64);
        }
        assert_eq!(history.undo_len(), 3);
        while history.undo(100).is_some() {}
        assert_eq!(history.current().text, "b\n");
    }
}
