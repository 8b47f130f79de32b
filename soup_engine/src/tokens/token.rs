//! Positioned tokens derived from forms and read errors

use crate::logging::Code;
use crate::utils::{Position, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Syntactic category of a token; doubles as its markup class name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Symbol,
    List,
    Vector,
    Map,
    Set,
    Number,
    String,
    Keyword,
    Error,
}

impl Category {
    pub fn class_name(&self) -> &'static str {
        match self {
            Category::Symbol => "symbol",
            Category::List => "list",
            Category::Vector => "vector",
            Category::Map => "map",
            Category::Set => "set",
            Category::Number => "number",
            Category::String => "string",
            Category::Keyword => "keyword",
            Category::Error => "error",
        }
    }

    /// Collections are the only tokens eligible for nesting depth and colouring
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            Category::List | Category::Vector | Category::Map | Category::Set
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Index in extraction order
    pub id: usize,
    pub category: Category,
    /// Source text covered by the token; empty for errors
    pub text: String,
    pub start: Position,
    /// Just past the last character. `None` for errors, which are zero-width markers.
    pub end: Option<Position>,
    /// Number of enclosing collections
    pub depth: usize,
    /// Diagnostic for error tokens
    pub message: Option<String>,
    #[serde(skip)]
    pub code: Option<Code>,
}

impl Token {
    pub fn line(&self) -> u32 {
        self.start.line
    }

    pub fn column(&self) -> u32 {
        self.start.column
    }

    pub fn end_line(&self) -> Option<u32> {
        self.end.map(|end| end.line)
    }

    pub fn end_column(&self) -> Option<u32> {
        self.end.map(|end| end.column)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end.unwrap_or(self.start))
    }

    pub fn is_collection(&self) -> bool {
        self.category.is_collection()
    }

    pub fn is_error(&self) -> bool {
        self.category == Category::Error
    }
}
