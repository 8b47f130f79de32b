//! Begin/end tag descriptors keyed by line

use crate::tokens::{Category, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    Open {
        token_id: usize,
        category: Category,
        message: Option<String>,
    },
    Close {
        token_id: usize,
    },
}

/// A markup event anchored before the character at `(line, column)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub line: u32,
    pub column: u32,
    pub event: TagEvent,
}

impl Tag {
    pub fn is_close(&self) -> bool {
        matches!(self.event, TagEvent::Close { .. })
    }
}

/// Project each token into an open tag plus, when it has an end position, a close tag.
/// Output order follows the tokens; callers group by line.
pub fn build(tokens: &[Token]) -> Vec<Tag> {
    let mut tags = Vec::with_capacity(tokens.len() * 2);

    for token in tokens {
        tags.push(Tag {
            line: token.line(),
            column: token.column(),
            event: TagEvent::Open {
                token_id: token.id,
                category: token.category,
                message: token.message.clone(),
            },
        });

        if let Some(end) = token.end {
            tags.push(Tag {
                line: end.line,
                column: end.column,
                event: TagEvent::Close { token_id: token.id },
            });
        }
    }

    tags
}
