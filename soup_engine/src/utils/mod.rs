//! Shared primitives for the soup engine
//!
//! Source positions and spans used by the reader, the token stream, the line
//! renderer and the session's cursor bookkeeping, plus the clocks that drive
//! debouncing.

pub mod clock;
pub mod span;

pub use clock::{Clock, ManualClock, SystemClock};
pub use span::{Position, SourceMap, Span};
