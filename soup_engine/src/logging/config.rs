//! Logging configuration: compile-time limits plus runtime preferences

use crate::config::compile_time::logging::*;
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime preferences; the first call wins
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime preferences already initialized".to_string())
}

/// Get runtime preferences (with fallback to defaults)
fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}

pub fn include_session_context() -> bool {
    get_runtime_preferences().include_session_context
}

/// Memory logger capacity (compile-time constant)
pub fn get_log_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

/// Clip a message to `MAX_LOG_MESSAGE_LENGTH` characters
pub fn truncate_message(message: &str) -> String {
    match message.char_indices().nth(MAX_LOG_MESSAGE_LENGTH) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}

pub fn get_config_summary() -> String {
    format!(
        "Logging configuration:\n  min level: {}\n  structured: {}\n  console: {}\n  buffer size: {}\n  source: {}\n",
        get_min_log_level().as_str(),
        use_structured_logging(),
        use_console_logging(),
        get_log_buffer_size(),
        crate::config::build_info::source_info(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_message() {
        assert_eq!(truncate_message("short"), "short");
        let long = "x".repeat(MAX_LOG_MESSAGE_LENGTH + 10);
        let clipped = truncate_message(&long);
        assert_eq!(clipped.len(), MAX_LOG_MESSAGE_LENGTH + 3);
        assert!(clipped.ends_with("..."));
    }

    #[test]
    fn test_config_summary() {
        let summary = get_config_summary();
        assert!(summary.contains("buffer size"));
    }
}
