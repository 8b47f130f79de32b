//! Tokenizing reader with error recovery
//!
//! Wraps an EDN-style surface syntax in a lazy, finite sequence of forms or read
//! errors. A fresh [`Reader`] is constructed for every read; the sequence is not
//! restartable.

pub mod error;
pub mod form;
pub mod parser;

pub use error::ReadError;
pub use form::{Form, FormKind, MacroPrefix};
pub use parser::{is_valid_number, ReadResult, Reader};

use crate::config::runtime::ReaderPreferences;
use crate::logging::codes;
use crate::utils::Span;
use crate::{log_success, log_warning};

/// Read every top-level form of `text`
pub fn read_all(text: &str) -> Vec<ReadResult> {
    read_all_with_preferences(text, ReaderPreferences::default())
}

pub fn read_all_with_preferences(text: &str, preferences: ReaderPreferences) -> Vec<ReadResult> {
    let log_errors = preferences.log_read_errors;
    let items: Vec<ReadResult> = Reader::with_preferences(text, preferences).collect();

    if log_errors {
        for error in items.iter().filter_map(|item| item.as_ref().err()) {
            log_warning!(
                code = error.error_code(),
                &error.to_string(),
                span = Span::point(error.position())
            );
        }
    }

    log_success!(codes::success::READ_COMPLETE, "Read completed",
        "items" => items.len(),
        "errors" => items.iter().filter(|item| item.is_err()).count()
    );

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_all_collects_forms_and_errors() {
        let items = read_all("(a) ] [b]");
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
        assert!(items[2].is_ok());
    }

    #[test]
    fn test_read_all_empty_input() {
        assert!(read_all("").is_empty());
        assert!(read_all("  ; only a comment\n").is_empty());
    }
}
