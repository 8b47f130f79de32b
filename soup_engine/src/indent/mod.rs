//! Indentation normalization
//!
//! Applies an [`IndentType`] directive to an [`EditorState`] before it is committed.
//! The result always ends in a newline and its cursor points at the same logical
//! character as before. Delimiter scanning skips strings, comments and character
//! literals.

use crate::history::{EditorState, IndentType};

/// Extra indentation for lines inside a list, relative to its opening paren
const LIST_INDENT: usize = 2;
/// Extra indentation inside vectors, maps and sets
const DATA_INDENT: usize = 1;
/// Step used by forward/back indentation
const INDENT_STEP: usize = 2;

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenDelim {
    ch: char,
    /// 0-based character column within its line
    column: usize,
}

#[derive(Debug, Default)]
struct LineScan {
    /// Character indices of closers with no matching opener
    unmatched_closers: Vec<usize>,
    /// Index of the last character that is code (not whitespace or comment)
    last_code: Option<usize>,
}

/// Delimiter state carried from line to line
#[derive(Debug, Default, Clone)]
struct DelimiterScanner {
    stack: Vec<OpenDelim>,
    in_string: bool,
    escape: bool,
}

impl DelimiterScanner {
    fn scan_line(&mut self, line: &[char]) -> LineScan {
        let mut scan = LineScan::default();
        let mut i = 0;

        while i < line.len() {
            let ch = line[i];

            if self.in_string {
                if self.escape {
                    self.escape = false;
                } else if ch == '\\' {
                    self.escape = true;
                } else if ch == '"' {
                    self.in_string = false;
                }
                scan.last_code = Some(i);
                i += 1;
                continue;
            }

            match ch {
                ';' => break,
                '\\' => {
                    // Character literal: the next char is never a delimiter
                    i = (i + 1).min(line.len() - 1);
                    scan.last_code = Some(i);
                }
                '"' => {
                    self.in_string = true;
                    scan.last_code = Some(i);
                }
                '(' | '[' | '{' => {
                    self.stack.push(OpenDelim { ch, column: i });
                    scan.last_code = Some(i);
                }
                ')' | ']' | '}' => {
                    let matches = self
                        .stack
                        .last()
                        .is_some_and(|open| closing_for(open.ch) == ch);
                    if matches {
                        self.stack.pop();
                        scan.last_code = Some(i);
                    } else {
                        scan.unmatched_closers.push(i);
                    }
                }
                c if c.is_whitespace() || c == ',' => {}
                _ => scan.last_code = Some(i),
            }
            i += 1;
        }

        if self.escape && !self.in_string {
            self.escape = false;
        }
        scan
    }

    fn target_indent(&self) -> Option<usize> {
        self.stack.last().map(|open| {
            open.column
                + if open.ch == '(' {
                    LIST_INDENT
                } else {
                    DATA_INDENT
                }
        })
    }
}

/// Replace `delete` chars at `at` with `insert`
#[derive(Debug, Clone)]
struct TextEdit {
    at: usize,
    delete: usize,
    insert: String,
    /// A cursor exactly at `at` (or inside the deleted range) ends up after the insertion
    push_cursor: bool,
}

fn map_cursor(cursor: usize, edits: &[TextEdit]) -> usize {
    let mut delta: isize = 0;
    for edit in edits {
        let inserted = edit.insert.chars().count();
        if cursor < edit.at || (cursor == edit.at && edit.delete == 0 && !edit.push_cursor) {
            break;
        }
        if cursor < edit.at + edit.delete {
            let base = edit.at as isize + delta;
            let pushed = if edit.push_cursor { inserted } else { 0 };
            return (base + pushed as isize).max(0) as usize;
        }
        delta += inserted as isize - edit.delete as isize;
    }
    (cursor as isize + delta).max(0) as usize
}

fn apply_edits(state: &EditorState, mut edits: Vec<TextEdit>) -> EditorState {
    if edits.is_empty() {
        return state.clone();
    }
    edits.sort_by_key(|edit| (edit.at, edit.delete));

    let chars: Vec<char> = state.text.chars().collect();
    let mut text = String::with_capacity(state.text.len() + 16);
    let mut pos = 0;
    for edit in &edits {
        let at = edit.at.clamp(pos, chars.len());
        text.extend(&chars[pos..at]);
        text.push_str(&edit.insert);
        pos = (at + edit.delete).min(chars.len());
    }
    text.extend(&chars[pos..]);

    EditorState {
        text,
        cursor_start: map_cursor(state.cursor_start, &edits),
        cursor_end: map_cursor(state.cursor_end, &edits),
        indent_type: state.indent_type,
    }
}

/// Lines as char vectors plus the char offset where each starts
fn split_lines(text: &str) -> Vec<(usize, Vec<char>)> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        let len = chars.len();
        lines.push((offset, chars));
        offset += len + 1;
    }
    lines
}

fn leading_whitespace(line: &[char]) -> usize {
    line.iter().take_while(|c| **c == ' ' || **c == '\t').count()
}

fn line_of(lines: &[(usize, Vec<char>)], offset: usize) -> usize {
    lines
        .iter()
        .rposition(|(start, _)| *start <= offset)
        .unwrap_or(0)
}

/// Re-indent lines inside open collections; `only_line` restricts to one line
fn reindent(state: &EditorState, only_line: Option<usize>) -> EditorState {
    let lines = split_lines(&state.text);
    let cursor_line = line_of(&lines, state.cursor_start);
    let mut scanner = DelimiterScanner::default();
    let mut edits = Vec::new();

    for (index, (start, chars)) in lines.iter().enumerate() {
        let selected = only_line.map_or(true, |line| line == index);
        let blank = chars.iter().all(|c| c.is_whitespace());
        let target = scanner.target_indent();

        match target {
            Some(indent) if selected && !scanner.in_string && (!blank || index == cursor_line) => {
                let current = leading_whitespace(chars);
                let already = current == indent && chars[..current].iter().all(|c| *c == ' ');
                if !already {
                    edits.push(TextEdit {
                        at: *start,
                        delete: current,
                        insert: " ".repeat(indent),
                        push_cursor: true,
                    });
                }
                let mut reindented = vec![' '; indent];
                reindented.extend_from_slice(&chars[current..]);
                scanner.scan_line(&reindented);
            }
            _ => {
                scanner.scan_line(chars);
            }
        }
    }

    apply_edits(state, edits)
}

/// Drop unmatched closers and append the missing ones after the last code character
fn auto_close(state: &EditorState) -> EditorState {
    let lines = split_lines(&state.text);
    let mut scanner = DelimiterScanner::default();
    let mut edits = Vec::new();
    let mut last_code = None;

    for (start, chars) in &lines {
        let scan = scanner.scan_line(chars);
        for index in scan.unmatched_closers {
            edits.push(TextEdit {
                at: start + index,
                delete: 1,
                insert: String::new(),
                push_cursor: false,
            });
        }
        if let Some(index) = scan.last_code {
            last_code = Some(start + index);
        }
    }

    if !scanner.in_string && !scanner.stack.is_empty() {
        let closers: String = scanner
            .stack
            .iter()
            .rev()
            .map(|open| closing_for(open.ch))
            .collect();
        edits.push(TextEdit {
            at: last_code.map_or(0, |index| index + 1),
            delete: 0,
            insert: closers,
            push_cursor: false,
        });
    }

    apply_edits(state, edits)
}

/// Add or remove one indent step on every line the selection touches
fn shift_selection(state: &EditorState, forward: bool) -> EditorState {
    let lines = split_lines(&state.text);
    let first = line_of(&lines, state.cursor_start);
    let last = line_of(&lines, state.cursor_end);

    let edits = lines[first..=last]
        .iter()
        .filter_map(|(start, chars)| {
            if forward {
                Some(TextEdit {
                    at: *start,
                    delete: 0,
                    insert: " ".repeat(INDENT_STEP),
                    push_cursor: true,
                })
            } else {
                let removable = chars
                    .iter()
                    .take(INDENT_STEP)
                    .take_while(|c| **c == ' ')
                    .count();
                (removable > 0).then(|| TextEdit {
                    at: *start,
                    delete: removable,
                    insert: String::new(),
                    push_cursor: false,
                })
            }
        })
        .collect();

    apply_edits(state, edits)
}

/// Apply the state's pending directive and guarantee a trailing newline
pub fn normalize(state: &EditorState) -> EditorState {
    let mut normalized = match state.indent_type {
        None => state.clone(),
        Some(IndentType::Paren) => reindent(state, None),
        Some(IndentType::Indent) => auto_close(state),
        Some(IndentType::Return) => {
            let line = line_of(&split_lines(&state.text), state.cursor_start);
            reindent(state, Some(line))
        }
        Some(IndentType::Forward) => shift_selection(state, true),
        Some(IndentType::Back) => shift_selection(state, false),
        Some(IndentType::Both) => reindent(&auto_close(state), None),
    };

    if !normalized.text.ends_with('\n') {
        normalized.text.push('\n');
    }
    normalized.indent_type = None;
    let (start, end) = (normalized.cursor_start, normalized.cursor_end);
    normalized.set_cursor(start, end);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, cursor: usize, indent: IndentType) -> EditorState {
        normalize(&EditorState::new(text, cursor, cursor).with_indent(indent))
    }

    #[test]
    fn test_trailing_newline_always_added() {
        let state = normalize(&EditorState::new("(a)", 3, 3));
        assert_eq!(state.text, "(a)\n");
        assert_eq!(state.cursor_start, 3);
        assert!(state.indent_type.is_none());

        let unchanged = normalize(&EditorState::new("x\n", 1, 1));
        assert_eq!(unchanged.text, "x\n");
    }

    #[test]
    fn test_paren_mode_reindents_inside_collections() {
        let state = run("(defn f\nx\n      [a\nb])", 0, IndentType::Paren);
        assert_eq!(state.text, "(defn f\n  x\n  [a\n   b])\n");
    }

    #[test]
    fn test_paren_mode_leaves_strings_and_top_level_alone() {
        let state = run("(str \"a\n   b\")\n  top", 0, IndentType::Paren);
        assert_eq!(state.text, "(str \"a\n   b\")\n  top\n");
    }

    #[test]
    fn test_return_indents_cursor_line_only() {
        // cursor at start of the empty line after "(let [x 1]"
        let text = "(let [x 1]\n\n)";
        let state = run(text, 11, IndentType::Return);
        assert_eq!(state.text, "(let [x 1]\n  \n)\n");
        assert_eq!(state.cursor_start, 13);
    }

    #[test]
    fn test_indent_mode_closes_and_drops() {
        let state = run("(a [b ; c\n", 2, IndentType::Indent);
        assert_eq!(state.text, "(a [b]) ; c\n");
        assert_eq!(state.cursor_start, 2);

        let dropped = run("a)) b", 5, IndentType::Indent);
        assert_eq!(dropped.text, "a b\n");
        assert_eq!(dropped.cursor_start, 3);
    }

    #[test]
    fn test_indent_mode_ignores_delimiters_in_strings_and_chars() {
        let state = run("(str \")\" \\( ", 0, IndentType::Indent);
        assert_eq!(state.text, "(str \")\" \\() \n");
    }

    #[test]
    fn test_both_closes_then_indents() {
        let state = run("(do\nx", 5, IndentType::Both);
        assert_eq!(state.text, "(do\n  x)\n");
        assert_eq!(state.cursor_start, 7);
    }

    #[test]
    fn test_forward_and_back() {
        let selected = EditorState::new("a\nb\nc", 0, 2).with_indent(IndentType::Forward);
        let forward = normalize(&selected);
        assert_eq!(forward.text, "  a\n  b\nc\n");
        assert_eq!((forward.cursor_start, forward.cursor_end), (2, 6));

        let back = normalize(&EditorState::new(forward.text.clone(), 6, 6).with_indent(IndentType::Back));
        assert_eq!(back.text, "  a\nb\nc\n");
        assert_eq!(back.cursor_start, 4);
    }

    #[test]
    fn test_cursor_follows_text_after_reindent() {
        // cursor on 'y' in the second line
        let text = "(f\n        y)";
        let state = run(text, 11, IndentType::Paren);
        assert_eq!(state.text, "(f\n  y)\n");
        assert_eq!(state.text.chars().nth(state.cursor_start), Some('y'));
    }
}
