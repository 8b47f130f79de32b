//! Read errors
//!
//! Errors are values in the read sequence, never panics or early returns out of the
//! pipeline. Every error carries the position where it was detected (for collection
//! EOF errors that is the opening delimiter).

use crate::config::compile_time::reader::{MAX_FORMS_PER_READ, MAX_NESTING_DEPTH};
use crate::logging::codes;
use crate::utils::Position;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("Unmatched delimiter: {delimiter}")]
    UnmatchedDelimiter { delimiter: char, position: Position },

    #[error("Unmatched delimiter: {found}, expected {expected} to close {opener} at {opened_at}")]
    MismatchedDelimiter {
        opener: char,
        expected: char,
        found: char,
        opened_at: Position,
        position: Position,
    },

    #[error("EOF while reading, starting at line {}", .position.line)]
    UnexpectedEof { opener: char, position: Position },

    #[error("EOF while reading string")]
    UnterminatedString { position: Position },

    #[error("EOF while reading character")]
    EofInCharacter { position: Position },

    #[error("Map literal must contain an even number of forms, found {count}")]
    OddMapForms { count: usize, position: Position },

    #[error("No dispatch macro for: {}", .found.map(String::from).unwrap_or_else(|| "EOF".to_string()))]
    InvalidDispatch {
        found: Option<char>,
        position: Position,
    },

    #[error("Invalid number: {text}")]
    InvalidNumber { text: String, position: Position },

    #[error("Invalid token: {text}")]
    InvalidToken { text: String, position: Position },

    #[error("Nesting deeper than {MAX_NESTING_DEPTH} levels")]
    NestingTooDeep { position: Position },

    #[error("Reader macro {prefix} is not followed by a form")]
    DanglingMacro {
        prefix: &'static str,
        position: Position,
    },

    #[error("More than {MAX_FORMS_PER_READ} top-level forms; remaining text left unread")]
    FormLimitExceeded { position: Position },
}

impl ReadError {
    pub fn position(&self) -> Position {
        match self {
            ReadError::UnmatchedDelimiter { position, .. }
            | ReadError::MismatchedDelimiter { position, .. }
            | ReadError::UnexpectedEof { position, .. }
            | ReadError::UnterminatedString { position }
            | ReadError::EofInCharacter { position }
            | ReadError::OddMapForms { position, .. }
            | ReadError::InvalidDispatch { position, .. }
            | ReadError::InvalidNumber { position, .. }
            | ReadError::InvalidToken { position, .. }
            | ReadError::NestingTooDeep { position }
            | ReadError::DanglingMacro { position, .. }
            | ReadError::FormLimitExceeded { position } => *position,
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            ReadError::UnmatchedDelimiter { .. } => codes::reader::UNMATCHED_DELIMITER,
            ReadError::MismatchedDelimiter { .. } => codes::reader::MISMATCHED_DELIMITER,
            ReadError::UnexpectedEof { .. } | ReadError::EofInCharacter { .. } => {
                codes::reader::UNEXPECTED_EOF
            }
            ReadError::UnterminatedString { .. } => codes::reader::UNTERMINATED_STRING,
            ReadError::OddMapForms { .. } => codes::reader::ODD_MAP_FORMS,
            ReadError::InvalidDispatch { .. } => codes::reader::INVALID_DISPATCH,
            ReadError::InvalidNumber { .. } => codes::reader::INVALID_NUMBER,
            ReadError::InvalidToken { .. } => codes::reader::INVALID_TOKEN,
            ReadError::NestingTooDeep { .. } => codes::reader::NESTING_TOO_DEEP,
            ReadError::DanglingMacro { .. } => codes::reader::DANGLING_MACRO,
            ReadError::FormLimitExceeded { .. } => codes::reader::FORM_LIMIT_EXCEEDED,
        }
    }

    /// Errors after which the reader cannot resynchronize; the sequence ends
    pub fn ends_read(&self) -> bool {
        matches!(
            self,
            ReadError::UnexpectedEof { .. }
                | ReadError::UnterminatedString { .. }
                | ReadError::EofInCharacter { .. }
                | ReadError::NestingTooDeep { .. }
                | ReadError::FormLimitExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_non_empty_and_coded() {
        let position = Position::new(3, 1, 4);
        let errors = [
            ReadError::UnmatchedDelimiter {
                delimiter: ')',
                position,
            },
            ReadError::InvalidDispatch {
                found: None,
                position,
            },
            ReadError::DanglingMacro {
                prefix: "~@",
                position,
            },
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
            assert_eq!(error.position(), position);
            assert_eq!(crate::logging::codes::get_category(error.error_code().as_str()), "Reader");
        }
    }

    #[test]
    fn test_eof_errors_end_the_read() {
        let position = Position::start();
        assert!(ReadError::UnexpectedEof {
            opener: '(',
            position
        }
        .ends_read());
        assert!(!ReadError::OddMapForms { count: 3, position }.ends_read());
        assert_eq!(
            ReadError::InvalidDispatch {
                found: Some('x'),
                position
            }
            .to_string(),
            "No dispatch macro for: x"
        );
    }
}
