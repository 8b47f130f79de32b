//! Consolidated error codes and classification system
//!
//! Single source of truth for all codes emitted by the engine and their metadata.
//! Read and evaluation codes describe conditions that are rendered inline and never
//! halt the editor; session codes are the only ones that abort initialization.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Read error codes (malformed source, rendered inline)
pub mod reader {
    use super::Code;

    pub const UNMATCHED_DELIMITER: Code = Code::new("E020");
    pub const MISMATCHED_DELIMITER: Code = Code::new("E021");
    pub const UNEXPECTED_EOF: Code = Code::new("E022");
    pub const UNTERMINATED_STRING: Code = Code::new("E023");
    pub const ODD_MAP_FORMS: Code = Code::new("E024");
    pub const INVALID_DISPATCH: Code = Code::new("E025");
    pub const INVALID_NUMBER: Code = Code::new("E026");
    pub const NESTING_TOO_DEEP: Code = Code::new("E027");
    pub const DANGLING_MACRO: Code = Code::new("E028");
    pub const FORM_LIMIT_EXCEEDED: Code = Code::new("E029");
    pub const INVALID_TOKEN: Code = Code::new("E030");
}

/// Render pipeline codes
pub mod render {
    use super::Code;

    pub const TOKEN_LIMIT_EXCEEDED: Code = Code::new("E040");
    pub const MESSAGE_TRUNCATED: Code = Code::new("E041");
}

/// Edit history codes
pub mod history {
    use super::Code;

    pub const HISTORY_TRIMMED: Code = Code::new("E050");
    pub const NOTHING_TO_UNDO: Code = Code::new("E051");
    pub const NOTHING_TO_REDO: Code = Code::new("E052");
}

/// Session integration codes (fatal at initialization)
pub mod session {
    use super::Code;

    pub const MISSING_CONTAINER: Code = Code::new("E060");
    pub const INVALID_CONFIGURATION: Code = Code::new("E061");
    pub const CURSOR_OUT_OF_RANGE: Code = Code::new("E062");
}

/// Evaluation collaborator codes
pub mod eval {
    use super::Code;

    pub const EVALUATOR_FAILURE: Code = Code::new("E070");
    pub const STALE_RESULTS_DISCARDED: Code = Code::new("E071");
    pub const UNKNOWN_REQUEST: Code = Code::new("E072");
    pub const RESULT_COUNT_MISMATCH: Code = Code::new("E073");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");

    pub const READ_COMPLETE: Code = Code::new("I020");
    pub const RENDER_COMPLETE: Code = Code::new("I040");
    pub const HISTORY_TRANSITION_APPLIED: Code = Code::new("I050");

    pub const SESSION_CREATED: Code = Code::new("I060");
    pub const SESSION_DESTROYED: Code = Code::new("I061");

    pub const EVAL_DISPATCHED: Code = Code::new("I070");
    pub const EVAL_RESULTS_APPLIED: Code = Code::new("I071");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

const REGISTRY_ENTRIES: &[ErrorMetadata] = &[
    // System errors
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal engine error",
        "File a bug report with the input that triggered it",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        true,
        "Engine initialization failure",
        "Check logging and configuration setup",
    ),
    // Reader errors
    ErrorMetadata::new(
        "E020",
        "Reader",
        Severity::Low,
        true,
        false,
        "Closing delimiter without a matching opener",
        "Remove the extra delimiter",
    ),
    ErrorMetadata::new(
        "E021",
        "Reader",
        Severity::Low,
        true,
        false,
        "Closing delimiter does not match the open collection",
        "Use the closing delimiter of the innermost open collection",
    ),
    ErrorMetadata::new(
        "E022",
        "Reader",
        Severity::Low,
        true,
        false,
        "End of input inside an open collection",
        "Close the collection",
    ),
    ErrorMetadata::new(
        "E023",
        "Reader",
        Severity::Low,
        true,
        false,
        "String literal is not terminated",
        "Add the closing double quote",
    ),
    ErrorMetadata::new(
        "E024",
        "Reader",
        Severity::Low,
        true,
        false,
        "Map literal contains an odd number of forms",
        "Give every key a value",
    ),
    ErrorMetadata::new(
        "E025",
        "Reader",
        Severity::Low,
        true,
        false,
        "Unknown dispatch character after #",
        "Use one of #{ #( #\" #_ #'",
    ),
    ErrorMetadata::new(
        "E026",
        "Reader",
        Severity::Low,
        true,
        false,
        "Malformed number literal",
        "Fix the number syntax",
    ),
    ErrorMetadata::new(
        "E027",
        "Reader",
        Severity::Medium,
        true,
        false,
        "Collections nested deeper than the configured limit",
        "Flatten the nesting",
    ),
    ErrorMetadata::new(
        "E028",
        "Reader",
        Severity::Low,
        true,
        false,
        "Reader macro with no form to wrap",
        "Follow the macro character with a form",
    ),
    ErrorMetadata::new(
        "E029",
        "Reader",
        Severity::Medium,
        true,
        false,
        "Too many top-level forms in one read",
        "Split the buffer",
    ),
    ErrorMetadata::new(
        "E030",
        "Reader",
        Severity::Low,
        true,
        false,
        "Token is not a valid symbol, keyword or character",
        "Fix the token spelling",
    ),
    // Render errors
    ErrorMetadata::new(
        "E040",
        "Render",
        Severity::Medium,
        true,
        false,
        "Token stream exceeded the configured limit and was truncated",
        "Raise the token limit or shrink the buffer",
    ),
    ErrorMetadata::new(
        "E041",
        "Render",
        Severity::Low,
        true,
        false,
        "Error message truncated for display",
        "No action required",
    ),
    // History
    ErrorMetadata::new(
        "E050",
        "History",
        Severity::Low,
        true,
        false,
        "Oldest undo entry dropped to respect the history bound",
        "No action required",
    ),
    ErrorMetadata::new(
        "E051",
        "History",
        Severity::Low,
        true,
        false,
        "Undo requested with an empty undo stack",
        "No action required",
    ),
    ErrorMetadata::new(
        "E052",
        "History",
        Severity::Low,
        true,
        false,
        "Redo requested with an empty redo stack",
        "No action required",
    ),
    // Session
    ErrorMetadata::new(
        "E060",
        "Session",
        Severity::Critical,
        false,
        true,
        "Required render container is missing",
        "Provide a container element name when creating the session",
    ),
    ErrorMetadata::new(
        "E061",
        "Session",
        Severity::Critical,
        false,
        true,
        "Invalid editor configuration",
        "Fix the configuration values",
    ),
    ErrorMetadata::new(
        "E062",
        "Session",
        Severity::High,
        false,
        true,
        "Cursor offset lies outside the text",
        "Report cursors as character offsets within the buffer",
    ),
    // Evaluation
    ErrorMetadata::new(
        "E070",
        "Eval",
        Severity::Medium,
        true,
        false,
        "Evaluator failed to accept a request",
        "Check the evaluator collaborator",
    ),
    ErrorMetadata::new(
        "E071",
        "Eval",
        Severity::Low,
        true,
        false,
        "Results arrived for a render that is no longer current",
        "No action required",
    ),
    ErrorMetadata::new(
        "E072",
        "Eval",
        Severity::Low,
        true,
        false,
        "Results arrived for an unknown request",
        "No action required",
    ),
    ErrorMetadata::new(
        "E073",
        "Eval",
        Severity::Medium,
        true,
        false,
        "Result count does not match the number of forms sent",
        "Return one result per form",
    ),
    // Success
    ErrorMetadata::new(
        "I001",
        "Success",
        Severity::Low,
        true,
        false,
        "Operation completed",
        "None",
    ),
    ErrorMetadata::new(
        "I004",
        "Success",
        Severity::Low,
        true,
        false,
        "Logging system initialized",
        "None",
    ),
    ErrorMetadata::new(
        "I020",
        "Reader",
        Severity::Low,
        true,
        false,
        "Buffer read completed",
        "None",
    ),
    ErrorMetadata::new(
        "I040",
        "Render",
        Severity::Low,
        true,
        false,
        "Render pipeline completed",
        "None",
    ),
    ErrorMetadata::new(
        "I050",
        "History",
        Severity::Low,
        true,
        false,
        "History transition applied",
        "None",
    ),
    ErrorMetadata::new(
        "I060",
        "Session",
        Severity::Low,
        true,
        false,
        "Editor session created",
        "None",
    ),
    ErrorMetadata::new(
        "I061",
        "Session",
        Severity::Low,
        true,
        false,
        "Editor session destroyed",
        "None",
    ),
    ErrorMetadata::new(
        "I070",
        "Eval",
        Severity::Low,
        true,
        false,
        "Evaluation request dispatched",
        "None",
    ),
    ErrorMetadata::new(
        "I071",
        "Eval",
        Severity::Low,
        true,
        false,
        "Evaluation results applied",
        "None",
    ),
];

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ENTRIES
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
