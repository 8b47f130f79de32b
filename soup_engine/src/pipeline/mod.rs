//! Render pipeline
//!
//! text -> reader -> token extraction -> delimiter colouring -> tags -> line renderer.
//! Every stage is a pure function of its input; read errors become inline markup
//! and never abort a render.

pub mod output;

pub use output::{EvalForm, RenderOutput};

use crate::config::runtime::{ReaderPreferences, RenderPreferences, RuntimeConfig};
use crate::logging::codes;
use crate::markup::{tags, Coloring, DelimiterColorer, LineRenderer};
use crate::reader;
use crate::tokens::TokenExtractor;
use crate::{log_debug, log_warning};

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub reader: ReaderPreferences,
    pub render: RenderPreferences,
}

impl From<&RuntimeConfig> for RenderOptions {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            reader: config.reader.clone(),
            render: config.render.clone(),
        }
    }
}

/// Run the full pipeline over `text`
pub fn render(text: &str, options: &RenderOptions) -> RenderOutput {
    let items = reader::read_all_with_preferences(text, options.reader.clone());

    let mut extractor = TokenExtractor::new(text);
    for item in &items {
        extractor.extract(item);
    }
    let stream = extractor.finish();

    if stream.truncated {
        log_warning!(code = codes::render::TOKEN_LIMIT_EXCEEDED,
            "Token limit reached; remaining forms render as plain text",
            "tokens" => stream.len()
        );
    }

    let coloring: Coloring = if options.render.rainbow_delimiters {
        DelimiterColorer::from_preferences(&options.render).colorize(&stream.tokens)
    } else {
        Coloring::new()
    };

    let tags = tags::build(&stream.tokens);
    let html = LineRenderer::new(&coloring).render(text, &tags);
    let line_count = text.split_terminator('\n').count();

    log_debug!("Render pipeline completed",
        "lines" => line_count,
        "tokens" => stream.len(),
        "tags" => tags.len()
    );

    RenderOutput {
        html,
        tag_count: tags.len(),
        line_count,
        truncated: stream.truncated,
        tokens: stream.tokens,
        coloring,
        generation: 0,
    }
}

/// Render with preferences taken from the environment
pub fn render_default(text: &str) -> RenderOutput {
    render(text, &RenderOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::strip_markup;
    use crate::tokens::Category;

    #[test]
    fn test_render_example() {
        let output = render_default("(foo [1 2] :bar)\n");
        assert_eq!(output.line_count, 1);
        assert!(!output.has_errors());
        assert_eq!(output.tokens.iter().filter(|t| t.is_collection()).count(), 2);
        assert_eq!(strip_markup(&output.html), "(foo [1 2] :bar)\n");
    }

    #[test]
    fn test_invalid_input_still_renders() {
        let output = render_default("(foo\n");
        assert_eq!(output.error_count(), 1);
        assert!(output.html.contains("class='error'"));
    }

    #[test]
    fn test_eval_forms_are_top_level() {
        let output = render_default("(def x 1)\nx\n:k\n[1\n 2]\n");
        let forms = output.eval_forms();
        let sources: Vec<_> = forms.iter().map(|f| f.source.as_str()).collect();
        assert_eq!(sources, vec!["(def x 1)", "x", "[1\n 2]"]);
        assert_eq!(forms[2].span.line_count(), 2);
    }

    #[test]
    fn test_form_limit_keeps_remaining_text() {
        let options = RenderOptions {
            reader: ReaderPreferences {
                max_forms_per_read: 1,
                ..ReaderPreferences::default()
            },
            ..RenderOptions::default()
        };
        let text = "(a)\n(b c)\n";
        let output = render(text, &options);
        assert_eq!(output.error_count(), 1);
        assert_eq!(output.errors().next().map(|t| t.line()), Some(2));
        assert_eq!(output.tokens.iter().filter(|t| t.is_collection()).count(), 1);
        assert_eq!(strip_markup(&output.html), text);
    }

    #[test]
    fn test_long_quote_chain_renders_one_error() {
        let text = format!("{}x\n", "'".repeat(5_000));
        let output = render_default(&text);
        assert_eq!(output.error_count(), 1);
        assert_eq!(strip_markup(&output.html), text);
    }

    #[test]
    fn test_rainbow_can_be_disabled() {
        let options = RenderOptions {
            render: RenderPreferences {
                rainbow_delimiters: false,
                ..RenderPreferences::default()
            },
            ..RenderOptions::default()
        };
        let output = render("(a)\n", &options);
        assert!(output.coloring.is_empty());
        assert!(output.html.starts_with("<span class='list'>"));
        assert_eq!(output.tokens[0].category, Category::List);
    }
}
