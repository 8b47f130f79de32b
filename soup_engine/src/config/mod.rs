//! Configuration module for the soup engine
//! Compile-time limits come from the TOML profile, runtime preferences from the environment

// Generated at build time from config/<profile>.toml
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{
    ConfigError, EvalPreferences, HistoryPreferences, LoggingPreferences, PaletteVariant,
    ReaderPreferences, RenderPreferences, RuntimeConfig,
};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("SOUP_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("SOUP_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_constants_are_sane() {
        assert!(compile_time::reader::MAX_NESTING_DEPTH > 0);
        assert!(compile_time::reader::MAX_TOKEN_COUNT > 0);
        assert_eq!(compile_time::render::RAINBOW_CLASS_COUNT, 10);
        assert_eq!(compile_time::render::RAINBOW_COLOR_COUNT, 7);
        assert!(compile_time::history::MAX_HISTORY_ENTRIES > 0);
        assert!(compile_time::logging::LOG_BUFFER_SIZE >= 100);
    }

    #[test]
    fn test_build_info() {
        assert!(super::build_info::source_info().ends_with(".toml"));
    }
}
