//! Editor state snapshot

use serde::{Deserialize, Serialize};

/// Pending indentation directive applied before a state is committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentType {
    /// Re-indent every line inside an open collection
    Paren,
    /// Drop unmatched closers and append missing ones
    Indent,
    /// Re-indent the cursor's line only
    Return,
    /// Indent the selected lines by two spaces
    Forward,
    /// Outdent the selected lines by up to two spaces
    Back,
    /// `Indent` then `Paren`
    Both,
}

/// Text plus selection. Cursor offsets count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorState {
    pub text: String,
    pub cursor_start: usize,
    pub cursor_end: usize,
    pub indent_type: Option<IndentType>,
}

impl EditorState {
    pub fn new(text: impl Into<String>, cursor_start: usize, cursor_end: usize) -> Self {
        let (cursor_start, cursor_end) = if cursor_start <= cursor_end {
            (cursor_start, cursor_end)
        } else {
            (cursor_end, cursor_start)
        };
        Self {
            text: text.into(),
            cursor_start,
            cursor_end,
            indent_type: None,
        }
    }

    pub fn with_indent(mut self, indent_type: IndentType) -> Self {
        self.indent_type = Some(indent_type);
        self
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn has_selection(&self) -> bool {
        self.cursor_start != self.cursor_end
    }

    pub fn set_cursor(&mut self, start: usize, end: usize) {
        let len = self.char_len();
        self.cursor_start = start.min(end).min(len);
        self.cursor_end = start.max(end).min(len);
    }
}
