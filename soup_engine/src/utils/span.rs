//! Source location tracking
//!
//! Positions are tracked in three coordinates at once: a byte offset for slicing the
//! buffer, and a 1-based line/column pair where the column counts characters (a tab is
//! one column). The line renderer cuts lines at these columns, so they must agree with
//! `str::chars` on the same line.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number in characters (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Create the starting position (offset 0, line 1, column 1)
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advance position by one character
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            _ => Self {
                offset: self.offset + ch.len_utf8(),
                line: self.line,
                column: self.column + 1,
            },
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    /// Zero-width span at a position (error markers)
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Get the byte length of this span
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Number of physical lines the span touches
    pub fn line_count(&self) -> u32 {
        self.end.line.saturating_sub(self.start.line) + 1
    }

    /// Get the source text for this span from the input
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        input
            .get(self.start.offset..self.end.offset)
            .unwrap_or_default()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Line-start index over a buffer, for converting character offsets (as the
/// host reports cursors) into line/column pairs and back.
#[derive(Debug, Clone)]
pub struct SourceMap<'a> {
    source: &'a str,
    /// Character offsets of line starts
    line_starts: Vec<usize>,
}

impl<'a> SourceMap<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (index, ch) in source.chars().enumerate() {
            if ch == '\n' {
                line_starts.push(index + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line and column for a character offset; offsets past the end clamp to the end
    pub fn position_at(&self, char_offset: usize) -> Position {
        let total = self.source.chars().count();
        let char_offset = char_offset.min(total);
        let line = match self.line_starts.binary_search(&char_offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        let column = char_offset - self.line_starts[line];
        let offset = self
            .source
            .char_indices()
            .nth(char_offset)
            .map(|(byte, _)| byte)
            .unwrap_or(self.source.len());

        Position::new(offset, (line + 1) as u32, (column + 1) as u32)
    }

    /// Character offset of a 1-based line/column pair, if it lies on that line
    pub fn offset_of(&self, line: u32, column: u32) -> Option<usize> {
        let line_idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(line_idx)?;
        let line_len = self.get_line(line)?.chars().count();
        let col_idx = (column as usize).checked_sub(1)?;
        (col_idx <= line_len).then_some(start + col_idx)
    }

    /// Get a line of text by line number (1-based), without its newline
    pub fn get_line(&self, line_num: u32) -> Option<&'a str> {
        let line_idx = (line_num as usize).checked_sub(1)?;
        self.source.split('\n').nth(line_idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_tracks_lines_and_chars() {
        let pos = "ab\n\tλx".chars().fold(Position::start(), Position::advance);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 4);
        assert_eq!(pos.offset, "ab\n\tλx".len());
    }

    #[test]
    fn test_span_slice_and_lines() {
        let text = "(a\n b)";
        let start = Position::start();
        let end = text.chars().fold(start, Position::advance);
        let span = Span::new(start, end);
        assert_eq!(span.slice(text), text);
        assert_eq!(span.line_count(), 2);
        assert_eq!(span.to_string(), "1:1-2:4");
    }

    #[test]
    fn test_source_map_position_at() {
        let map = SourceMap::new("ab\ncd\n");
        assert_eq!(map.position_at(0), Position::new(0, 1, 1));
        assert_eq!(map.position_at(3), Position::new(3, 2, 1));
        assert_eq!(map.position_at(5), Position::new(5, 2, 3));
        assert_eq!(map.position_at(99).line, 3);
    }

    #[test]
    fn test_source_map_offset_of() {
        let map = SourceMap::new("ab\ncd");
        assert_eq!(map.offset_of(2, 2), Some(4));
        assert_eq!(map.offset_of(1, 3), Some(2));
        assert_eq!(map.offset_of(1, 4), None);
        assert_eq!(map.offset_of(0, 1), None);
        assert_eq!(map.get_line(2), Some("cd"));
    }
}
