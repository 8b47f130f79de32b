//! Editor sessions
//!
//! An [`EditorSession`] is the host-facing object: it classifies input events, drives
//! the edit history, re-renders after every committed change and runs the debounced
//! evaluation and error-reveal work when the host calls [`EditorSession::tick`].

pub mod editor;
pub mod error;
pub mod events;

pub use editor::{EditorSession, RenderHook, SessionConfig, TickOutcome};
pub use error::SessionError;
pub use events::{EventCategory, Key, KeyEvent, Platform};
