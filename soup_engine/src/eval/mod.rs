//! Evaluation collaborator
//!
//! The session hands the source of every top-level form to an [`Evaluator`] after the
//! debounce window closes. Results come back later through
//! `EditorSession::apply_eval_results` and are only applied while the render they
//! were computed for is still current.

pub mod debounce;
pub mod results;

pub use debounce::{Debouncer, KeyedDebouncer};
pub use results::{annotate, render_results_html, Annotation, EvalResult};

use serde::Serialize;
use thiserror::Error;

use crate::logging::codes;

/// One batch of forms, tagged with the render generation it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvalRequest {
    pub id: u64,
    pub generation: u64,
    pub forms: Vec<String>,
}

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Evaluator unavailable: {0}")]
    Unavailable(String),

    #[error("Evaluator rejected request {id}: {reason}")]
    Rejected { id: u64, reason: String },
}

impl EvalError {
    pub fn error_code(&self) -> crate::logging::Code {
        codes::eval::EVALUATOR_FAILURE
    }
}

/// Accepts requests; results are delivered asynchronously by the host
pub trait Evaluator {
    fn evaluate(&mut self, request: &EvalRequest) -> Result<(), EvalError>;
}

impl<F> Evaluator for F
where
    F: FnMut(&EvalRequest) -> Result<(), EvalError>,
{
    fn evaluate(&mut self, request: &EvalRequest) -> Result<(), EvalError> {
        self(request)
    }
}
