//! Parsed forms produced by the reader

use crate::utils::Span;
use serde::{Deserialize, Serialize};

/// Reader macro that wrapped a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacroPrefix {
    /// `'form`
    Quote,
    /// `` `form ``
    SyntaxQuote,
    /// `~form`
    Unquote,
    /// `~@form`
    UnquoteSplicing,
    /// `@form`
    Deref,
    /// `#'form`
    Var,
    /// `^meta form`; the metadata form is kept so it can be highlighted
    Meta(Box<Form>),
    /// `#tag form`
    Tagged(String),
    /// `#_form` when discards are read rather than skipped
    Discard,
}

impl MacroPrefix {
    /// Fixed source text of the prefix; tagged literals report the bare `#`
    pub fn label(&self) -> &'static str {
        match self {
            MacroPrefix::Quote => "'",
            MacroPrefix::SyntaxQuote => "`",
            MacroPrefix::Unquote => "~",
            MacroPrefix::UnquoteSplicing => "~@",
            MacroPrefix::Deref => "@",
            MacroPrefix::Var => "#'",
            MacroPrefix::Meta(_) => META_LABEL,
            MacroPrefix::Tagged(_) => "#",
            MacroPrefix::Discard => "#_",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MacroPrefix::Tagged(tag) => tag,
            other => other.label(),
        }
    }
}

/// Source text of the metadata prefix, needed before its `Meta` form exists
pub(crate) const META_LABEL: &str = "^";

/// Closed set of form shapes. Leaf variants hold their exact source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormKind {
    List(Vec<Form>),
    Vector(Vec<Form>),
    Map(Vec<Form>),
    Set(Vec<Form>),
    Symbol(String),
    Number(String),
    /// Strings, regex literals and character literals
    Str(String),
    Keyword(String),
    Wrapped {
        prefix: MacroPrefix,
        inner: Box<Form>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub kind: FormKind,
    /// From the first character of the form (including any `#` dispatch or macro
    /// prefix) to just past its last character
    pub span: Span,
}

impl Form {
    pub fn new(kind: FormKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self.kind,
            FormKind::List(_) | FormKind::Vector(_) | FormKind::Map(_) | FormKind::Set(_)
        )
    }

    pub fn children(&self) -> &[Form] {
        match &self.kind {
            FormKind::List(items)
            | FormKind::Vector(items)
            | FormKind::Map(items)
            | FormKind::Set(items) => items,
            _ => &[],
        }
    }

    /// Strip reader-macro wrappers down to the form they annotate
    pub fn unwrapped(&self) -> &Form {
        let mut form = self;
        while let FormKind::Wrapped { inner, .. } = &form.kind {
            form = inner;
        }
        form
    }
}
