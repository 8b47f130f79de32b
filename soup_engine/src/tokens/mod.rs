//! Token stream
//!
//! Flattens read forms and read errors into an ordered list of positioned tokens.
//! Collection tokens carry their end position and nesting depth, so later stages
//! never re-derive structure from markup.

pub mod extract;
pub mod token;

pub use extract::{extract_all, TokenExtractor, TokenStream};
pub use token::{Category, Token};
