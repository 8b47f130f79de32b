//! Token to markup pipeline stages
//!
//! - [`tags`]: project tokens into per-line open/close events
//! - [`render`]: re-segment lines and interleave text with markup
//! - [`rainbow`]: depth-based delimiter colouring
//! - [`html`]: escaping and the markup stripper

pub mod html;
pub mod rainbow;
pub mod render;
pub mod tags;

pub use html::{escape, strip_markup};
pub use rainbow::{Coloring, DelimiterColorer, Paint, Palette};
pub use render::{segment_line, LineRenderer};
pub use tags::{Tag, TagEvent};
