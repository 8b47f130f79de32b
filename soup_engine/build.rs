// build.rs - TOML-driven compile-time constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    reader: ReaderLimits,
    render: RenderLimits,
    history: HistoryLimits,
    eval: EvalLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct ReaderLimits {
    max_nesting_depth: usize,
    max_forms_per_read: usize,
    max_token_count: usize,
}

#[derive(serde::Deserialize)]
struct RenderLimits {
    rainbow_class_count: usize,
    rainbow_color_count: usize,
    max_error_message_length: usize,
}

#[derive(serde::Deserialize)]
struct HistoryLimits {
    max_history_entries: usize,
    default_coalesce_window_ms: u64,
}

#[derive(serde::Deserialize)]
struct EvalLimits {
    eval_debounce_ms: u64,
    error_reveal_delay_ms: u64,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SOUP_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=SOUP_CONFIG_DIR");

    let profile = env::var("SOUP_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("SOUP_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Config lives at the workspace root (parent of soup_engine)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_constraints(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_constraints(config: &CompileTimeConfig, profile: &str) {
    // Reading, token extraction and dropping forms all recurse per nesting level
    const ABSOLUTE_MAX_NESTING_DEPTH: usize = 1_024;
    const ABSOLUTE_MAX_DEBOUNCE_MS: u64 = 10_000;

    if config.reader.max_nesting_depth == 0 || config.reader.max_nesting_depth > ABSOLUTE_MAX_NESTING_DEPTH {
        panic!("CONFIG: reader.max_nesting_depth must be in 1..={}", ABSOLUTE_MAX_NESTING_DEPTH);
    }

    if config.reader.max_forms_per_read == 0 || config.reader.max_token_count == 0 {
        panic!("CONFIG: reader limits cannot be zero");
    }

    // Palette sizes are part of the rendered markup contract
    if config.render.rainbow_class_count != 10 {
        panic!("CONFIG: render.rainbow_class_count must be 10");
    }

    if config.render.rainbow_color_count != 7 {
        panic!("CONFIG: render.rainbow_color_count must be 7");
    }

    if config.history.max_history_entries == 0 {
        panic!("CONFIG: history.max_history_entries cannot be zero");
    }

    if config.eval.eval_debounce_ms > ABSOLUTE_MAX_DEBOUNCE_MS
        || config.eval.error_reveal_delay_ms > ABSOLUTE_MAX_DEBOUNCE_MS
    {
        panic!("CONFIG: debounce windows exceed {} ms", ABSOLUTE_MAX_DEBOUNCE_MS);
    }

    if config.logging.log_buffer_size < 100 {
        panic!("CONFIG: logging.log_buffer_size too small (min 100)");
    }

    if profile == "production" && config.reader.max_nesting_depth > 1_000 {
        panic!("PRODUCTION: reader.max_nesting_depth too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod reader {{
        pub const MAX_NESTING_DEPTH: usize = {};
        pub const MAX_FORMS_PER_READ: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
    }}

    pub mod render {{
        pub const RAINBOW_CLASS_COUNT: usize = {};
        pub const RAINBOW_COLOR_COUNT: usize = {};
        pub const MAX_ERROR_MESSAGE_LENGTH: usize = {};
    }}

    pub mod history {{
        pub const MAX_HISTORY_ENTRIES: usize = {};
        pub const DEFAULT_COALESCE_WINDOW_MS: u64 = {};
    }}

    pub mod eval {{
        pub const EVAL_DEBOUNCE_MS: u64 = {};
        pub const ERROR_REVEAL_DELAY_MS: u64 = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.reader.max_nesting_depth,
        config.reader.max_forms_per_read,
        config.reader.max_token_count,
        config.render.rainbow_class_count,
        config.render.rainbow_color_count,
        config.render.max_error_message_length,
        config.history.max_history_entries,
        config.history.default_coalesce_window_ms,
        config.eval.eval_debounce_ms,
        config.eval.error_reveal_delay_ms,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
