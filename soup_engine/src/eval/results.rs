//! Evaluation results and their side-panel markup

use serde::{Deserialize, Serialize};

use crate::markup::html::escape;
use crate::pipeline::EvalForm;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum EvalResult {
    Value(String),
    Error(String),
}

impl EvalResult {
    pub fn is_error(&self) -> bool {
        matches!(self, EvalResult::Error(_))
    }

    pub fn text(&self) -> &str {
        match self {
            EvalResult::Value(text) | EvalResult::Error(text) => text,
        }
    }
}

/// A result placed beside the form it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// First line of the form (1-based)
    pub line: u32,
    /// Number of lines the form spans
    pub height: u32,
    pub result: EvalResult,
}

/// Pair results with forms by index; extra entries on either side are dropped
pub fn annotate(forms: &[EvalForm], results: &[EvalResult]) -> Vec<Annotation> {
    forms
        .iter()
        .zip(results)
        .map(|(form, result)| Annotation {
            line: form.span.start.line,
            height: form.span.line_count(),
            result: result.clone(),
        })
        .collect()
}

/// One block per annotation; `data-top` is the zero-based line offset
pub fn render_results_html(annotations: &[Annotation]) -> String {
    annotations
        .iter()
        .map(|annotation| {
            let class = if annotation.result.is_error() {
                "result error"
            } else {
                "result"
            };
            format!(
                "<div class='{}' data-top='{}' data-height='{}'>{}</div>",
                class,
                annotation.line.saturating_sub(1),
                annotation.height,
                escape(annotation.result.text())
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::render_default;

    #[test]
    fn test_annotations_follow_forms() {
        let output = render_default("(def x 1)\n\n(+ x\n   2)\n");
        let forms = output.eval_forms();
        let results = vec![
            EvalResult::Value("#'user/x".to_string()),
            EvalResult::Error("boom <here>".to_string()),
        ];

        let annotations = annotate(&forms, &results);
        assert_eq!(annotations.len(), 2);
        assert_eq!((annotations[1].line, annotations[1].height), (3, 2));

        let html = render_results_html(&annotations);
        assert_eq!(
            html,
            "<div class='result' data-top='0' data-height='1'>#&#39;user/x</div>\
             <div class='result error' data-top='2' data-height='2'>boom &lt;here&gt;</div>"
        );
    }

    #[test]
    fn test_result_json_shape() {
        let json = serde_json::to_string(&EvalResult::Error("bad".to_string())).unwrap();
        assert_eq!(json, r#"{"kind":"error","text":"bad"}"#);
    }
}
