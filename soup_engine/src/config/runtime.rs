// RUNTIME PREFERENCES (User Experience)

use crate::config::compile_time::{eval, history, reader};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Errors raised while loading runtime configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> crate::logging::Code {
        crate::logging::codes::session::INVALID_CONFIGURATION
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_number<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderPreferences {
    /// Treat `#_` forms as invisible instead of reading them
    pub honor_discard: bool,

    /// Log every read error as a warning event
    pub log_read_errors: bool,

    /// Top-level forms read before the rest of the text is left unread
    /// (never above the compile-time limit)
    pub max_forms_per_read: usize,
}

impl Default for ReaderPreferences {
    fn default() -> Self {
        Self {
            honor_discard: env_flag(env_vars::READER_HONOR_DISCARD, true),
            log_read_errors: env_flag(env_vars::READER_LOG_ERRORS, false),
            max_forms_per_read: env_number(
                env_vars::READER_MAX_FORMS,
                reader::MAX_FORMS_PER_READ,
            ),
        }
    }
}

/// Which palette the delimiter colorer draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteVariant {
    /// Named `rainbow-N` classes
    Classes,
    /// Inline RGB colours
    Colors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderPreferences {
    pub palette: PaletteVariant,

    /// Depth assigned to a top-level collection (0 or -1)
    pub base_depth: i32,

    /// Whether to colour delimiters at all
    pub rainbow_delimiters: bool,
}

impl Default for RenderPreferences {
    fn default() -> Self {
        let palette = match env::var(env_vars::RENDER_PALETTE).ok().as_deref() {
            Some("colors") => PaletteVariant::Colors,
            _ => PaletteVariant::Classes,
        };
        Self {
            palette,
            base_depth: env_number(env_vars::RENDER_BASE_DEPTH, 0),
            rainbow_delimiters: env_flag(env_vars::RENDER_RAINBOW, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryPreferences {
    /// Edits closer together than this are folded into one undo step
    pub coalesce_window_ms: u64,

    /// Upper bound on retained undo entries (never above the compile-time limit)
    pub max_entries: usize,
}

impl Default for HistoryPreferences {
    fn default() -> Self {
        Self {
            coalesce_window_ms: env_number(
                env_vars::HISTORY_COALESCE_MS,
                history::DEFAULT_COALESCE_WINDOW_MS,
            ),
            max_entries: env_number(env_vars::HISTORY_MAX_ENTRIES, history::MAX_HISTORY_ENTRIES),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalPreferences {
    pub enabled: bool,
    pub debounce_ms: u64,
    pub error_reveal_delay_ms: u64,
}

impl Default for EvalPreferences {
    fn default() -> Self {
        Self {
            enabled: env_flag(env_vars::EVAL_ENABLED, true),
            debounce_ms: env_number(env_vars::EVAL_DEBOUNCE_MS, eval::EVAL_DEBOUNCE_MS),
            error_reveal_delay_ms: env_number(
                env_vars::EVAL_ERROR_REVEAL_MS,
                eval::ERROR_REVEAL_DELAY_MS,
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Whether to attach the session id to every event
    pub include_session_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            include_session_context: env_flag(env_vars::LOGGING_INCLUDE_SESSION, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub reader: ReaderPreferences,
    pub render: RenderPreferences,
    pub history: HistoryPreferences,
    pub eval: EvalPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load preferences from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check preferences against the compile-time limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_forms = self.reader.max_forms_per_read;
        if max_forms == 0 || max_forms > reader::MAX_FORMS_PER_READ {
            return Err(ConfigError::InvalidValue {
                field: "reader.max_forms_per_read".to_string(),
                message: format!(
                    "must be in 1..={}, got {}",
                    reader::MAX_FORMS_PER_READ,
                    max_forms
                ),
            });
        }

        if !(-1..=0).contains(&self.render.base_depth) {
            return Err(ConfigError::InvalidValue {
                field: "render.base_depth".to_string(),
                message: format!("must be 0 or -1, got {}", self.render.base_depth),
            });
        }

        if self.history.max_entries == 0 || self.history.max_entries > history::MAX_HISTORY_ENTRIES {
            return Err(ConfigError::InvalidValue {
                field: "history.max_entries".to_string(),
                message: format!(
                    "must be in 1..={}, got {}",
                    history::MAX_HISTORY_ENTRIES,
                    self.history.max_entries
                ),
            });
        }

        Ok(())
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Reader
    pub const READER_HONOR_DISCARD: &str = "SOUP_READER_HONOR_DISCARD";
    pub const READER_LOG_ERRORS: &str = "SOUP_READER_LOG_ERRORS";
    pub const READER_MAX_FORMS: &str = "SOUP_READER_MAX_FORMS";

    // Render
    pub const RENDER_PALETTE: &str = "SOUP_RENDER_PALETTE";
    pub const RENDER_BASE_DEPTH: &str = "SOUP_RENDER_BASE_DEPTH";
    pub const RENDER_RAINBOW: &str = "SOUP_RENDER_RAINBOW";

    // History
    pub const HISTORY_COALESCE_MS: &str = "SOUP_HISTORY_COALESCE_MS";
    pub const HISTORY_MAX_ENTRIES: &str = "SOUP_HISTORY_MAX_ENTRIES";

    // Eval
    pub const EVAL_ENABLED: &str = "SOUP_EVAL_ENABLED";
    pub const EVAL_DEBOUNCE_MS: &str = "SOUP_EVAL_DEBOUNCE_MS";
    pub const EVAL_ERROR_REVEAL_MS: &str = "SOUP_EVAL_ERROR_REVEAL_MS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "SOUP_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "SOUP_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "SOUP_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_SESSION: &str = "SOUP_LOGGING_INCLUDE_SESSION";
}
