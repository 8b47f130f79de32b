//! Line renderer
//!
//! Re-segments each physical line at the columns where tags attach and interleaves
//! escaped text chunks with tag markup. Every line ends in `<br>`. Tags are sorted by
//! column with close tags ahead of open tags at the same column; the sort is stable,
//! so ties among opens keep token order.

use super::html::{escape, escape_text_chunk};
use super::rainbow::Coloring;
use super::tags::{Tag, TagEvent};
use crate::config::compile_time::render::MAX_ERROR_MESSAGE_LENGTH;
use crate::log_warning;
use crate::logging::codes;
use crate::tokens::Category;
use std::collections::BTreeMap;

pub const LINE_BREAK: &str = "<br>";
pub const CLOSE_MARKUP: &str = "</span>";

pub struct LineRenderer<'a> {
    coloring: &'a Coloring,
}

impl<'a> LineRenderer<'a> {
    pub fn new(coloring: &'a Coloring) -> Self {
        Self { coloring }
    }

    /// Render `text` with `tags` into one HTML string
    pub fn render(&self, text: &str, tags: &[Tag]) -> String {
        let lines: Vec<&str> = text.split_terminator('\n').collect();
        if lines.is_empty() {
            return String::new();
        }

        let last_line = lines.len() as u32;
        let mut by_line: BTreeMap<u32, Vec<&Tag>> = BTreeMap::new();
        for tag in tags {
            by_line
                .entry(tag.line.clamp(1, last_line))
                .or_default()
                .push(tag);
        }

        let mut html = String::with_capacity(text.len() * 2);
        for (index, line) in lines.iter().enumerate() {
            let line_tags = by_line.remove(&(index as u32 + 1)).unwrap_or_default();
            self.render_line(line, line_tags, &mut html);
        }
        html
    }

    fn render_line(&self, line: &str, mut tags: Vec<&Tag>, html: &mut String) {
        let chars: Vec<char> = line.chars().collect();
        let max_column = chars.len() as u32 + 1;
        let column_of = |tag: &Tag| tag.column.clamp(1, max_column);

        tags.sort_by_key(|tag| (column_of(*tag), !tag.is_close()));

        let mut columns: Vec<u32> = tags.iter().map(|tag| column_of(*tag)).collect();
        columns.dedup();

        let chunks = segment_line(&chars, &columns);
        let mut pending = tags.into_iter().peekable();

        for (chunk, column) in chunks.iter().zip(columns.iter().map(Some).chain([None])) {
            html.push_str(&escape_text_chunk(chunk));
            let Some(&column) = column else {
                break;
            };
            while let Some(tag) = pending.next_if(|tag| column_of(*tag) == column) {
                html.push_str(&self.classify(tag));
            }
        }

        html.push_str(LINE_BREAK);
    }

    /// Markup for one tag
    pub fn classify(&self, tag: &Tag) -> String {
        match &tag.event {
            TagEvent::Close { .. } => CLOSE_MARKUP.to_string(),
            TagEvent::Open {
                category: Category::Error,
                message,
                ..
            } => {
                let message = message.as_deref().unwrap_or_default();
                format!(
                    "<span class='error' data-message='{}'></span>",
                    escape(&clip_message(message))
                )
            }
            TagEvent::Open {
                token_id, category, ..
            } => {
                let paint = self.coloring.get(token_id);
                let mut class = category.class_name().to_string();
                if let Some(extra) = paint.and_then(|p| p.class()) {
                    class.push(' ');
                    class.push_str(&extra);
                }
                match paint.and_then(|p| p.style()) {
                    Some(style) => format!("<span class='{}' style='{}'>", class, style),
                    None => format!("<span class='{}'>", class),
                }
            }
        }
    }
}

fn clip_message(message: &str) -> String {
    match message.char_indices().nth(MAX_ERROR_MESSAGE_LENGTH) {
        Some((cut, _)) => {
            log_warning!(code = codes::render::MESSAGE_TRUNCATED,
                "Error message clipped for markup",
                "length" => message.chars().count()
            );
            format!("{}...", &message[..cut])
        }
        None => message.to_string(),
    }
}

/// Cut `chars` before each 1-based column in `columns` (sorted, distinct).
/// Always yields `columns.len() + 1` chunks, some possibly empty.
pub fn segment_line(chars: &[char], columns: &[u32]) -> Vec<String> {
    let mut chunks = Vec::with_capacity(columns.len() + 1);
    let mut from = 0usize;

    for &column in columns {
        let to = (column as usize - 1).clamp(from, chars.len());
        chunks.push(chars[from..to].iter().collect());
        from = to;
    }
    chunks.push(chars[from..].iter().collect());

    chunks
}
