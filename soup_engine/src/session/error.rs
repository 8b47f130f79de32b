//! Errors that abort session setup or reject host input

use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::codes;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No render container configured for the editor")]
    MissingContainer,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Cursor offset {cursor} is outside text of {len} characters")]
    CursorOutOfRange { cursor: usize, len: usize },

    #[error("Position {line}:{column} is not inside the text")]
    PositionOutOfRange { line: u32, column: u32 },
}

impl SessionError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            SessionError::MissingContainer => codes::session::MISSING_CONTAINER,
            SessionError::InvalidConfiguration(_) => codes::session::INVALID_CONFIGURATION,
            SessionError::CursorOutOfRange { .. } | SessionError::PositionOutOfRange { .. } => {
                codes::session::CURSOR_OUT_OF_RANGE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SessionError::MissingContainer.error_code(),
            codes::session::MISSING_CONTAINER
        );
        let error = SessionError::CursorOutOfRange { cursor: 9, len: 3 };
        assert_eq!(error.error_code(), codes::session::CURSOR_OUT_OF_RANGE);
        assert_eq!(
            error.to_string(),
            "Cursor offset 9 is outside text of 3 characters"
        );
        let error = SessionError::PositionOutOfRange { line: 4, column: 2 };
        assert_eq!(error.error_code(), codes::session::CURSOR_OUT_OF_RANGE);
        assert_eq!(error.to_string(), "Position 4:2 is not inside the text");
    }
}
