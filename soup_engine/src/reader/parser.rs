//! Position-tracking reader with error recovery
//!
//! The reader is a fused iterator over top-level forms. A syntax error becomes an
//! `Err` item and reading resumes at the character after the point of detection;
//! errors that leave nothing to resynchronize on (see [`ReadError::ends_read`])
//! terminate the sequence.

use super::error::ReadError;
use super::form::{Form, FormKind, MacroPrefix, META_LABEL};
use crate::config::compile_time::reader::{MAX_FORMS_PER_READ, MAX_NESTING_DEPTH};
use crate::config::runtime::ReaderPreferences;
use crate::utils::{Position, Span};

pub type ReadResult = Result<Form, ReadError>;

/// Characters that end a token
fn is_terminating(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(
            ch,
            ',' | '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';' | '@' | '^' | '`' | '~' | '\\'
        )
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn is_closing(ch: char) -> bool {
    matches!(ch, ')' | ']' | '}')
}

pub struct Reader<'a> {
    source: &'a str,
    pos: Position,
    preferences: ReaderPreferences,
    max_forms: usize,
    forms_read: usize,
    done: bool,
}

impl<'a> Reader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_preferences(source, ReaderPreferences::default())
    }

    pub fn with_preferences(source: &'a str, preferences: ReaderPreferences) -> Self {
        Self {
            source,
            pos: Position::start(),
            max_forms: preferences.max_forms_per_read.min(MAX_FORMS_PER_READ),
            preferences,
            forms_read: 0,
            done: false,
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    // ========================================================================
    // Character access
    // ========================================================================

    fn rest(&self) -> &'a str {
        self.source.get(self.pos.offset..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos = self.pos.advance(ch);
        Some(ch)
    }

    fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.pos)
    }

    fn text_from(&self, start: Position) -> &'a str {
        self.source
            .get(start.offset..self.pos.offset)
            .unwrap_or_default()
    }

    /// Whitespace, commas and `;` line comments
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || ch == ',' {
                self.bump();
            } else if ch == ';' {
                self.skip_line();
            } else {
                break;
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn read_token_text(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if is_terminating(ch) {
                break;
            }
            self.bump();
        }
        self.text_from(start)
    }

    // ========================================================================
    // Forms
    // ========================================================================

    /// Read one form; `Ok(None)` means nothing was produced (a `#_` discard, a `#!`
    /// line, or end of input)
    fn read_form(&mut self, depth: usize) -> Result<Option<Form>, ReadError> {
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        match ch {
            '(' | '[' | '{' => {
                self.bump();
                let items = self.read_delimited(ch, start, depth)?;
                let span = self.span_from(start);
                let kind = match ch {
                    '(' => FormKind::List(items),
                    '[' => FormKind::Vector(items),
                    _ => {
                        if items.len() % 2 != 0 {
                            return Err(ReadError::OddMapForms {
                                count: items.len(),
                                position: start,
                            });
                        }
                        FormKind::Map(items)
                    }
                };
                Ok(Some(Form::new(kind, span)))
            }
            ')' | ']' | '}' => {
                self.bump();
                Err(ReadError::UnmatchedDelimiter {
                    delimiter: ch,
                    position: start,
                })
            }
            '"' => {
                self.bump();
                self.read_string_body(start)?;
                Ok(Some(self.leaf(FormKind::Str, start)))
            }
            '\\' => self.read_character(start).map(Some),
            ':' => {
                let text = self.read_token_text();
                if text.len() == 1 || text.starts_with(":::") || text.ends_with(':') {
                    return Err(ReadError::InvalidToken {
                        text: text.to_string(),
                        position: start,
                    });
                }
                Ok(Some(self.leaf(FormKind::Keyword, start)))
            }
            '#' => self.read_dispatch(start, depth),
            '\'' => self.read_wrapped(MacroPrefix::Quote, 1, start, depth),
            '`' => self.read_wrapped(MacroPrefix::SyntaxQuote, 1, start, depth),
            '@' => self.read_wrapped(MacroPrefix::Deref, 1, start, depth),
            '~' => {
                if self.peek_second() == Some('@') {
                    self.read_wrapped(MacroPrefix::UnquoteSplicing, 2, start, depth)
                } else {
                    self.read_wrapped(MacroPrefix::Unquote, 1, start, depth)
                }
            }
            '^' => self.read_meta(start, depth),
            _ => {
                let text = self.read_token_text();
                if starts_number(text) {
                    if !is_valid_number(text) {
                        return Err(ReadError::InvalidNumber {
                            text: text.to_string(),
                            position: start,
                        });
                    }
                    Ok(Some(self.leaf(FormKind::Number, start)))
                } else {
                    Ok(Some(self.leaf(FormKind::Symbol, start)))
                }
            }
        }
    }

    fn leaf(&self, make: fn(String) -> FormKind, start: Position) -> Form {
        Form::new(make(self.text_from(start).to_string()), self.span_from(start))
    }

    /// Read the next form that is not discarded, for use inside a reader macro.
    /// Each prefix counts as one nesting level, so long prefix chains end the read
    /// instead of recursing without bound.
    fn read_macro_target(
        &mut self,
        label: &'static str,
        macro_start: Position,
        depth: usize,
    ) -> Result<Form, ReadError> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(ReadError::NestingTooDeep {
                position: macro_start,
            });
        }

        loop {
            self.skip_trivia();
            match self.peek() {
                None => {
                    return Err(ReadError::DanglingMacro {
                        prefix: label,
                        position: macro_start,
                    })
                }
                Some(ch) if is_closing(ch) => {
                    return Err(ReadError::DanglingMacro {
                        prefix: label,
                        position: macro_start,
                    })
                }
                Some(_) => {
                    if let Some(form) = self.read_form(depth + 1)? {
                        return Ok(form);
                    }
                }
            }
        }
    }

    fn read_wrapped(
        &mut self,
        prefix: MacroPrefix,
        width: usize,
        start: Position,
        depth: usize,
    ) -> Result<Option<Form>, ReadError> {
        for _ in 0..width {
            self.bump();
        }
        let inner = self.read_macro_target(prefix.label(), start, depth)?;
        let span = self.span_from(start);
        Ok(Some(Form::new(
            FormKind::Wrapped {
                prefix,
                inner: Box::new(inner),
            },
            span,
        )))
    }

    fn read_meta(&mut self, start: Position, depth: usize) -> Result<Option<Form>, ReadError> {
        self.bump();
        let meta = self.read_macro_target(META_LABEL, start, depth)?;
        let target = self.read_macro_target(META_LABEL, start, depth)?;
        let span = self.span_from(start);
        Ok(Some(Form::new(
            FormKind::Wrapped {
                prefix: MacroPrefix::Meta(Box::new(meta)),
                inner: Box::new(target),
            },
            span,
        )))
    }

    fn read_dispatch(&mut self, start: Position, depth: usize) -> Result<Option<Form>, ReadError> {
        self.bump();
        match self.peek() {
            Some('{') => {
                self.bump();
                let items = self.read_delimited('{', start, depth)?;
                Ok(Some(Form::new(FormKind::Set(items), self.span_from(start))))
            }
            Some('(') => {
                self.bump();
                let items = self.read_delimited('(', start, depth)?;
                Ok(Some(Form::new(FormKind::List(items), self.span_from(start))))
            }
            Some('"') => {
                self.bump();
                self.read_string_body(start)?;
                Ok(Some(self.leaf(FormKind::Str, start)))
            }
            Some('\'') => {
                // `#` already consumed; the quote is the remaining prefix char
                self.read_wrapped(MacroPrefix::Var, 1, start, depth)
            }
            Some('_') => {
                self.bump();
                let target = self.read_macro_target(MacroPrefix::Discard.label(), start, depth)?;
                if self.preferences.honor_discard {
                    Ok(None)
                } else {
                    let span = self.span_from(start);
                    Ok(Some(Form::new(
                        FormKind::Wrapped {
                            prefix: MacroPrefix::Discard,
                            inner: Box::new(target),
                        },
                        span,
                    )))
                }
            }
            Some('!') => {
                self.skip_line();
                Ok(None)
            }
            Some(ch) if ch.is_alphabetic() => {
                let prefix = MacroPrefix::Tagged(format!("#{}", self.read_token_text()));
                let target = self.read_macro_target(prefix.label(), start, depth)?;
                let span = self.span_from(start);
                Ok(Some(Form::new(
                    FormKind::Wrapped {
                        prefix,
                        inner: Box::new(target),
                    },
                    span,
                )))
            }
            found => {
                let position = self.pos;
                self.bump();
                Err(ReadError::InvalidDispatch { found, position })
            }
        }
    }

    /// Read forms up to the closer matching `open`; the opener is already consumed
    fn read_delimited(
        &mut self,
        open: char,
        open_pos: Position,
        depth: usize,
    ) -> Result<Vec<Form>, ReadError> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(ReadError::NestingTooDeep { position: open_pos });
        }

        let close = closing_for(open);
        let mut items = Vec::new();

        loop {
            self.skip_trivia();
            match self.peek() {
                None => {
                    return Err(ReadError::UnexpectedEof {
                        opener: open,
                        position: open_pos,
                    })
                }
                Some(ch) if ch == close => {
                    self.bump();
                    return Ok(items);
                }
                Some(ch) if is_closing(ch) => {
                    let position = self.pos;
                    self.bump();
                    return Err(ReadError::MismatchedDelimiter {
                        opener: open,
                        expected: close,
                        found: ch,
                        opened_at: open_pos,
                        position,
                    });
                }
                Some(_) => {
                    if let Some(form) = self.read_form(depth + 1)? {
                        items.push(form);
                    }
                }
            }
        }
    }

    /// Consume a string body after its opening quote
    fn read_string_body(&mut self, start: Position) -> Result<(), ReadError> {
        loop {
            match self.bump() {
                None => return Err(ReadError::UnterminatedString { position: start }),
                Some('"') => return Ok(()),
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err(ReadError::UnterminatedString { position: start });
                    }
                }
                Some(_) => {}
            }
        }
    }

    fn read_character(&mut self, start: Position) -> Result<Form, ReadError> {
        self.bump();
        if self.bump().is_none() {
            return Err(ReadError::EofInCharacter { position: start });
        }
        // Named characters (\newline, é) continue up to a terminator
        self.read_token_text();
        let text = self.text_from(start);
        let name = &text[1..];
        let valid = name.chars().count() == 1
            || matches!(
                name,
                "newline" | "space" | "tab" | "backspace" | "formfeed" | "return"
            )
            || (name.starts_with('u') && name.len() == 5 && name[1..].chars().all(|c| c.is_ascii_hexdigit()))
            || (name.starts_with('o') && name.len() <= 4 && name[1..].chars().all(|c| ('0'..='7').contains(&c)));
        if !valid {
            return Err(ReadError::InvalidToken {
                text: text.to_string(),
                position: start,
            });
        }
        Ok(self.leaf(FormKind::Str, start))
    }

    fn next_item(&mut self) -> Option<ReadResult> {
        loop {
            self.skip_trivia();
            self.peek()?;

            if self.forms_read >= self.max_forms {
                self.done = true;
                return Some(Err(ReadError::FormLimitExceeded { position: self.pos }));
            }

            match self.read_form(0) {
                Ok(None) => continue,
                Ok(Some(form)) => {
                    self.forms_read += 1;
                    return Some(Ok(form));
                }
                Err(error) => {
                    self.forms_read += 1;
                    if error.ends_read() {
                        self.done = true;
                    }
                    return Some(Err(error));
                }
            }
        }
    }
}

impl Iterator for Reader<'_> {
    type Item = ReadResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_item();
        if item.is_none() {
            self.done = true;
        }
        item
    }
}

impl std::iter::FusedIterator for Reader<'_> {}

fn starts_number(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('+') | Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Integers (`42`, `42N`, `0xFF`, `2r1010`), ratios (`1/2`) and decimals
/// (`1.5`, `1e10`, `1.5M`), each optionally signed
pub fn is_valid_number(text: &str) -> bool {
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    if body.is_empty() || !body.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }

    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    if let Some(hex) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        let hex = hex.strip_suffix('N').unwrap_or(hex);
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    if let Some((radix, digits)) = body.split_once(['r', 'R']) {
        let Ok(radix) = radix.parse::<u32>() else {
            return false;
        };
        return (2..=36).contains(&radix)
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_digit(radix));
    }

    if let Some((numerator, denominator)) = body.split_once('/') {
        return all_digits(numerator) && all_digits(denominator);
    }

    if let Some(int) = body.strip_suffix('N') {
        return all_digits(int);
    }

    let decimal = body.strip_suffix('M').unwrap_or(body);
    let (mantissa, exponent) = match decimal.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (decimal, None),
    };
    let mantissa_ok = match mantissa.split_once('.') {
        Some((int, frac)) => all_digits(int) && frac.chars().all(|c| c.is_ascii_digit()),
        None => all_digits(mantissa),
    };
    let exponent_ok = exponent.map_or(true, |e| all_digits(e.strip_prefix(['+', '-']).unwrap_or(e)));

    mantissa_ok && exponent_ok
}
