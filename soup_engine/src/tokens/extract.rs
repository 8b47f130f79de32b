//! Token extraction
//!
//! Walks each form depth-first, left to right, emitting the collection token before
//! its children. Reader-macro wrappers are transparent: the wrapped form supplies
//! the token. Output order matches source order, which the line renderer relies on.

use super::token::{Category, Token};
use crate::config::compile_time::reader::MAX_TOKEN_COUNT;
use crate::reader::{Form, FormKind, MacroPrefix, ReadError, ReadResult};

#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    /// Set when `MAX_TOKEN_COUNT` cut the stream short
    pub truncated: bool,
}

impl TokenStream {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.is_error())
    }

    pub fn collections(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.is_collection())
    }
}

pub struct TokenExtractor<'a> {
    source: &'a str,
    stream: TokenStream,
    limit: usize,
}

impl<'a> TokenExtractor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_limit(source, MAX_TOKEN_COUNT)
    }

    pub fn with_limit(source: &'a str, limit: usize) -> Self {
        Self {
            source,
            stream: TokenStream::default(),
            limit,
        }
    }

    pub fn extract(&mut self, item: &ReadResult) {
        match item {
            Ok(form) => self.extract_form(form, 0),
            Err(error) => self.extract_error(error),
        }
    }

    pub fn finish(self) -> TokenStream {
        self.stream
    }

    fn push(&mut self, mut token: Token) -> bool {
        if self.stream.tokens.len() >= self.limit {
            self.stream.truncated = true;
            return false;
        }
        token.id = self.stream.tokens.len();
        self.stream.tokens.push(token);
        true
    }

    fn extract_error(&mut self, error: &ReadError) {
        self.push(Token {
            id: 0,
            category: Category::Error,
            text: String::new(),
            start: error.position(),
            end: None,
            depth: 0,
            message: Some(error.to_string()),
            code: Some(error.error_code()),
        });
    }

    fn extract_form(&mut self, form: &Form, depth: usize) {
        let category = match &form.kind {
            FormKind::Wrapped { prefix, inner } => {
                if let MacroPrefix::Meta(meta) = prefix {
                    self.extract_form(meta, depth);
                }
                self.extract_form(inner, depth);
                return;
            }
            FormKind::List(_) => Category::List,
            FormKind::Vector(_) => Category::Vector,
            FormKind::Map(_) => Category::Map,
            FormKind::Set(_) => Category::Set,
            FormKind::Symbol(_) => Category::Symbol,
            FormKind::Number(_) => Category::Number,
            FormKind::Str(_) => Category::String,
            FormKind::Keyword(_) => Category::Keyword,
        };

        let accepted = self.push(Token {
            id: 0,
            category,
            text: form.span.slice(self.source).to_string(),
            start: form.span.start,
            end: Some(form.span.end),
            depth,
            message: None,
            code: None,
        });

        // A dropped collection must not leave orphaned children behind
        if !accepted {
            return;
        }

        for child in form.children() {
            self.extract_form(child, depth + 1);
        }
    }
}

/// Extract tokens from a whole read sequence
pub fn extract_all(source: &str, items: &[ReadResult]) -> TokenStream {
    let mut extractor = TokenExtractor::new(source);
    for item in items {
        extractor.extract(item);
    }
    extractor.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_all;

    fn tokens(text: &str) -> Vec<Token> {
        extract_all(text, &read_all(text)).tokens
    }

    #[test]
    fn test_example_token_shape() {
        let toks = tokens("(foo [1 2] :bar)");
        let shape: Vec<_> = toks.iter().map(|t| (t.category, t.depth)).collect();
        assert_eq!(
            shape,
            vec![
                (Category::List, 0),
                (Category::Symbol, 1),
                (Category::Vector, 1),
                (Category::Number, 2),
                (Category::Number, 2),
                (Category::Keyword, 1),
            ]
        );
        assert_eq!(toks[2].text, "[1 2]");
        assert_eq!(toks[0].end_column(), Some(17));
        assert!(toks.iter().enumerate().all(|(i, t)| t.id == i));
    }

    #[test]
    fn test_error_token() {
        let toks = tokens("(foo");
        assert_eq!(toks.len(), 1);
        assert!(toks[0].is_error());
        assert!(!toks[0].message.as_deref().unwrap_or_default().is_empty());
        assert_eq!((toks[0].line(), toks[0].column()), (1, 1));
        assert!(toks[0].end.is_none());
    }

    #[test]
    fn test_wrapped_forms_are_transparent() {
        let toks = tokens("'(a) ^:m b");
        let categories: Vec<_> = toks.iter().map(|t| t.category).collect();
        assert_eq!(
            categories,
            vec![Category::List, Category::Symbol, Category::Keyword, Category::Symbol]
        );
        assert_eq!(toks[0].column(), 2);
    }

    #[test]
    fn test_tokens_in_source_order() {
        let toks = tokens("(a\n (b c)) d");
        let offsets: Vec<_> = toks.iter().map(|t| t.start.offset).collect();
        let mut sorted = offsets.clone();
        sorted.sort();
        assert_eq!(offsets, sorted);
    }

    #[test]
    fn test_limit_truncates_without_orphans() {
        let text = "(a b) (c d)";
        let items = read_all(text);
        let mut extractor = TokenExtractor::with_limit(text, 4);
        for item in &items {
            extractor.extract(item);
        }
        let stream = extractor.finish();

        assert!(stream.truncated);
        assert_eq!(stream.len(), 4);
        assert_eq!(stream.tokens[3].category, Category::List);
        assert_eq!(stream.collections().count(), 2);
    }
}
