//! Laws the render pipeline and edit history must hold for arbitrary input

use std::collections::HashMap;

use proptest::prelude::*;

use soup_engine::config::HistoryPreferences;
use soup_engine::markup::{strip_markup, tags, DelimiterColorer, Palette, TagEvent};
use soup_engine::{render_default, EditHistory, EditorState};

fn well_formed_form() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[a-z][a-z0-9?!-]{0,4}",
        "-?[0-9]{1,3}",
        ":[a-z]{1,4}",
        "\"[a-z ]{0,5}\"",
    ];

    leaf.prop_recursive(4, 48, 6, |inner| {
        (prop::collection::vec(inner, 0..6), 0..4usize, any::<bool>()).prop_map(
            |(mut items, kind, multiline)| {
                let (open, close) = match kind {
                    0 => ("(", ")"),
                    1 => ("[", "]"),
                    2 => {
                        items.truncate(items.len() - items.len() % 2);
                        ("{", "}")
                    }
                    _ => ("#{", "}"),
                };
                let separator = if multiline { "\n " } else { " " };
                format!("{}{}{}", open, items.join(separator), close)
            },
        )
    })
}

fn well_formed_text() -> impl Strategy<Value = String> {
    prop::collection::vec(well_formed_form(), 0..4).prop_map(|forms| forms.join("\n"))
}

proptest! {
    #[test]
    fn stripping_rendered_markup_restores_text(text in "[()\\[\\]{}a-c0-9 :\"\\\\;#'@^`~&<>\n]{0,80}") {
        let output = render_default(&text);
        let expected = if text.is_empty() || text.ends_with('\n') {
            text.clone()
        } else {
            format!("{}\n", text)
        };
        prop_assert_eq!(strip_markup(&output.html), expected);
    }

    #[test]
    fn collection_tags_balance(text in well_formed_text()) {
        let output = render_default(&text);
        prop_assert_eq!(output.error_count(), 0);

        let mut opened: HashMap<usize, u32> = HashMap::new();
        let mut closed = 0usize;
        for tag in tags::build(&output.tokens) {
            match tag.event {
                TagEvent::Open { token_id, category, .. } if category.is_collection() => {
                    opened.insert(token_id, tag.line);
                }
                TagEvent::Close { token_id } => {
                    if let Some(open_line) = opened.get(&token_id) {
                        prop_assert!(tag.line >= *open_line);
                        closed += 1;
                    }
                }
                _ => {}
            }
        }
        prop_assert_eq!(opened.len(), closed);
        prop_assert_eq!(opened.len(), output.tokens.iter().filter(|t| t.is_collection()).count());
    }

    #[test]
    fn palette_is_periodic(depth in 0usize..500, base in -1i32..=0, classes in any::<bool>()) {
        let palette = if classes { Palette::Classes } else { Palette::Colors };
        let colorer = DelimiterColorer::new(palette, base);
        prop_assert_eq!(
            colorer.paint_for_depth(depth),
            colorer.paint_for_depth(depth + palette.size())
        );
    }

    #[test]
    fn undo_then_redo_restores_state(edits in prop::collection::vec("[a-z() \n]{0,12}", 1..12)) {
        let preferences = HistoryPreferences { coalesce_window_ms: 0, max_entries: 1000 };
        let mut history = EditHistory::new(EditorState::new("", 0, 0), &preferences, 0);
        for (i, text) in edits.iter().enumerate() {
            let len = text.chars().count();
            history.edit(EditorState::new(text.as_str(), len, len), false, i as u64);
        }

        let before = history.current().clone();
        if history.undo(1_000).is_some() {
            prop_assert!(history.redo(1_001).is_some());
        }
        prop_assert_eq!(history.current(), &before);
    }

    #[test]
    fn edit_after_undo_discards_redo(first in "[a-z]{1,6}", second in "[0-9]{1,6}") {
        let preferences = HistoryPreferences { coalesce_window_ms: 0, max_entries: 1000 };
        let mut history = EditHistory::new(EditorState::new("", 0, 0), &preferences, 0);
        history.edit(EditorState::new(first.as_str(), 0, 0), false, 1);
        history.undo(2);
        history.edit(EditorState::new(second.as_str(), 0, 0), false, 3);
        let before = history.current().clone();

        prop_assert!(history.redo(4).is_none());
        prop_assert_eq!(history.current(), &before);
    }
}
