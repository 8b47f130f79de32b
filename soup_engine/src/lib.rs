// Internal modules
pub mod config;
pub mod eval;
pub mod history;
pub mod indent;
#[macro_use]
pub mod logging;
pub mod markup;
pub mod pipeline;
pub mod reader;
pub mod session;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use config::{ConfigError, RuntimeConfig};
pub use history::{EditHistory, EditorState, IndentType, Transition};
pub use pipeline::{render, render_default, RenderOptions, RenderOutput};
pub use reader::{read_all, ReadError};
pub use session::{EditorSession, KeyEvent, SessionConfig, SessionError};
pub use tokens::{Category, Token};

// Re-export the evaluator seam for hosts
pub use eval::{EvalRequest, EvalResult, Evaluator};
