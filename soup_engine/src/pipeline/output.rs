use crate::markup::Coloring;
use crate::tokens::{Category, Token};
use crate::utils::Span;
use serde::Serialize;

/// One top-level form handed to the evaluator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvalForm {
    pub token_id: usize,
    pub source: String,
    pub span: Span,
}

/// Everything one run of the render pipeline produced
#[derive(Debug, Clone, Default)]
pub struct RenderOutput {
    pub html: String,
    pub tokens: Vec<Token>,
    pub coloring: Coloring,
    pub tag_count: usize,
    pub line_count: usize,
    /// Token limit cut the stream short
    pub truncated: bool,
    /// Bumped by the session on every render; results for older generations are stale
    pub generation: u64,
}

impl RenderOutput {
    pub fn errors(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|token| token.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Top-level collection and symbol tokens, in source order
    pub fn eval_forms(&self) -> Vec<EvalForm> {
        self.tokens
            .iter()
            .filter(|token| {
                token.depth == 0 && (token.is_collection() || token.category == Category::Symbol)
            })
            .map(|token| EvalForm {
                token_id: token.id,
                source: token.text.clone(),
                span: token.span(),
            })
            .collect()
    }
}
