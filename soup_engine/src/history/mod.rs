//! Edit history
//!
//! Owns the authoritative [`EditorState`] and the undo/redo stacks. Every committed
//! state has been through [`crate::indent::normalize`].

pub mod edit_history;
pub mod state;

pub use edit_history::{EditHistory, HistoryEntry, Transition};
pub use state::{EditorState, IndentType};
