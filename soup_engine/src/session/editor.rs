//! The editor session: history, rendering and the debounced side computations

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::error::SessionError;
use super::events::{EventCategory, KeyEvent, Platform};
use crate::config::RuntimeConfig;
use crate::eval::{
    annotate, render_results_html, Annotation, Debouncer, EvalRequest, EvalResult, Evaluator,
    KeyedDebouncer,
};
use crate::history::{EditHistory, EditorState, IndentType, Transition};
use crate::logging::{self, codes, with_session_context};
use crate::pipeline::{self, EvalForm, RenderOptions, RenderOutput};
use crate::utils::{Clock, Position, SourceMap, SystemClock};
use crate::{log_debug, log_error, log_success, log_warning};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Called after every committed transition with the latest render and state
pub type RenderHook = Box<dyn FnMut(&RenderOutput, &EditorState)>;

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Identifier of the host element the markup is rendered into
    pub container: Option<String>,
    pub runtime: RuntimeConfig,
    pub platform: Platform,
}

impl SessionConfig {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: Some(container.into()),
            ..Self::default()
        }
    }

    pub fn with_runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

/// What a call to [`EditorSession::tick`] set in motion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Id of the evaluation request handed to the evaluator
    pub dispatched: Option<u64>,
    /// Byte offsets of error markers whose reveal delay elapsed
    pub revealed: Vec<usize>,
}

struct PendingEval {
    generation: u64,
    forms: Vec<EvalForm>,
}

pub struct EditorSession {
    id: u64,
    config: SessionConfig,
    options: RenderOptions,
    clock: Arc<dyn Clock>,
    history: EditHistory,
    output: RenderOutput,
    generation: u64,
    eval_debouncer: Debouncer<u64>,
    reveal_debouncer: KeyedDebouncer<usize>,
    revealed: BTreeSet<usize>,
    evaluator: Option<Box<dyn Evaluator>>,
    pending: HashMap<u64, PendingEval>,
    next_request_id: u64,
    annotations: Vec<Annotation>,
    hooks: Vec<RenderHook>,
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("state", self.history.current())
            .field("pending_requests", &self.pending.len())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl EditorSession {
    /// Create a session on the wall clock
    pub fn new(config: SessionConfig, text: &str) -> Result<Self, SessionError> {
        Self::with_clock(config, text, Arc::new(SystemClock))
    }

    /// Create a session; the initial text is auto-closed, indented and rendered
    pub fn with_clock(
        config: SessionConfig,
        text: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SessionError> {
        let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);

        with_session_context(id, || -> Result<Self, SessionError> {
            if config.container.as_deref().map_or(true, |c| c.trim().is_empty()) {
                let error = SessionError::MissingContainer;
                log_error!(error.error_code(), &error.to_string());
                return Err(error);
            }

            if let Err(source) = config.runtime.validate() {
                let error = SessionError::from(source);
                log_error!(error.error_code(), &error.to_string());
                return Err(error);
            }

            // First session wins; logging preferences are process-wide
            if logging::config::init_runtime_preferences(config.runtime.logging.clone()).is_ok() {
                log_debug!("Logging preferences applied", "summary" => logging::config::get_config_summary());
            }

            let now = clock.now_ms();
            let initial = EditorState::new(text, 0, 0).with_indent(IndentType::Both);
            let history = EditHistory::new(initial, &config.runtime.history, now);
            let runtime = &config.runtime;

            let mut session = Self {
                id,
                options: RenderOptions::from(runtime),
                eval_debouncer: Debouncer::new(runtime.eval.debounce_ms),
                reveal_debouncer: KeyedDebouncer::new(runtime.eval.error_reveal_delay_ms),
                config,
                clock,
                history,
                output: RenderOutput::default(),
                generation: 0,
                revealed: BTreeSet::new(),
                evaluator: None,
                pending: HashMap::new(),
                next_request_id: 1,
                annotations: Vec::new(),
                hooks: Vec::new(),
            };
            session.rerender(now);

            log_success!(codes::success::SESSION_CREATED,
                "Editor session created",
                "container" => session.config.container.as_deref().unwrap_or_default(),
                "lines" => session.output.line_count
            );
            Ok(session)
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> &EditorState {
        self.history.current()
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn render_output(&self) -> &RenderOutput {
        &self.output
    }

    pub fn html(&self) -> &str {
        &self.output.html
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Markup for the evaluation side panel
    pub fn eval_html(&self) -> String {
        render_results_html(&self.annotations)
    }

    /// Error markers (by byte offset) whose reveal delay has elapsed since the last render
    pub fn revealed_errors(&self) -> Vec<usize> {
        self.revealed.iter().copied().collect()
    }

    /// Line and column of the cursor, for restoring the host caret after a render
    pub fn cursor_position(&self) -> Position {
        let state = self.history.current();
        SourceMap::new(&state.text).position_at(state.cursor_start)
    }

    /// Both ends of the selection
    pub fn selection_positions(&self) -> (Position, Position) {
        let state = self.history.current();
        let map = SourceMap::new(&state.text);
        (
            map.position_at(state.cursor_start),
            map.position_at(state.cursor_end),
        )
    }

    /// Register a post-render hook; it also runs on cursor-only transitions
    pub fn on_render(&mut self, hook: RenderHook) {
        self.hooks.push(hook);
    }

    /// Attach the evaluator and schedule an evaluation of the current render
    pub fn set_evaluator(&mut self, evaluator: Box<dyn Evaluator>) {
        self.evaluator = Some(evaluator);
        self.schedule_eval(self.clock.now_ms());
    }

    // ========================================================================
    // HOST EVENTS
    // ========================================================================

    /// Apply a key event. `text` and `cursor` are the host buffer after the key landed.
    pub fn handle_key(
        &mut self,
        event: &KeyEvent,
        text: &str,
        cursor: (usize, usize),
    ) -> Result<Option<Transition>, SessionError> {
        let id = self.id;
        with_session_context(id, || -> Result<Option<Transition>, SessionError> {
            let category = event.classify(self.config.platform);
            let now = self.clock.now_ms();
            log_debug!("Key event", "category" => format!("{:?}", category));

            let transition = match category {
                EventCategory::Ignored => None,
                EventCategory::UndoOrRedo if event.shift => self.history.redo(now),
                EventCategory::UndoOrRedo => self.history.undo(now),
                EventCategory::Arrows => {
                    let state = self.state_from(text, cursor)?;
                    self.history.move_cursor(state.cursor_start, state.cursor_end);
                    Some(Transition::CursorMove)
                }
                EventCategory::Tab => {
                    let indent = if event.shift {
                        IndentType::Back
                    } else {
                        IndentType::Forward
                    };
                    let state = self.state_from(text, cursor)?.with_indent(indent);
                    Some(self.history.edit(state, false, now))
                }
                EventCategory::Enter => {
                    let state = self.state_from(text, cursor)?.with_indent(IndentType::Return);
                    Some(self.history.edit(state, false, now))
                }
                EventCategory::General => {
                    let state = self.state_from(text, cursor)?;
                    Some(self.history.edit(state, true, now))
                }
            };

            Ok(self.commit(transition, now))
        })
    }

    /// Mouse-up: the selection may have changed, the text has not
    pub fn handle_pointer_up(&mut self, cursor: (usize, usize)) -> Result<Transition, SessionError> {
        let id = self.id;
        with_session_context(id, || -> Result<Transition, SessionError> {
            let len = self.history.current().char_len();
            Self::check_cursor(cursor, len)?;
            self.history.move_cursor(cursor.0, cursor.1);
            let now = self.clock.now_ms();
            self.commit(Some(Transition::CursorMove), now);
            Ok(Transition::CursorMove)
        })
    }

    /// Cut or paste: the whole state is re-derived
    pub fn handle_clipboard(
        &mut self,
        text: &str,
        cursor: (usize, usize),
    ) -> Result<Transition, SessionError> {
        let id = self.id;
        with_session_context(id, || -> Result<Transition, SessionError> {
            let state = self.state_from(text, cursor)?;
            let now = self.clock.now_ms();
            let transition = self.history.structural_edit(state, now);
            self.commit(Some(transition), now);
            Ok(transition)
        })
    }

    // ========================================================================
    // DIRECT TRANSITIONS
    // ========================================================================

    /// Replace the text programmatically; never coalesced
    pub fn edit(
        &mut self,
        text: &str,
        cursor: (usize, usize),
        indent: Option<IndentType>,
    ) -> Result<Transition, SessionError> {
        let id = self.id;
        with_session_context(id, || -> Result<Transition, SessionError> {
            let mut state = self.state_from(text, cursor)?;
            state.indent_type = indent;
            let now = self.clock.now_ms();
            let transition = self.history.edit(state, false, now);
            self.commit(Some(transition), now);
            Ok(transition)
        })
    }

    pub fn undo(&mut self) -> Option<Transition> {
        let id = self.id;
        with_session_context(id, || {
            let now = self.clock.now_ms();
            let transition = self.history.undo(now);
            self.commit(transition, now)
        })
    }

    pub fn redo(&mut self) -> Option<Transition> {
        let id = self.id;
        with_session_context(id, || {
            let now = self.clock.now_ms();
            let transition = self.history.redo(now);
            self.commit(transition, now)
        })
    }

    pub fn move_cursor(&mut self, start: usize, end: usize) -> Result<Transition, SessionError> {
        self.handle_pointer_up((start, end))
    }

    /// Collapse the selection onto a 1-based line and column, as hosts that
    /// track carets by line report them
    pub fn move_cursor_to(&mut self, line: u32, column: u32) -> Result<Transition, SessionError> {
        let offset = SourceMap::new(&self.history.current().text).offset_of(line, column);
        match offset {
            Some(offset) => self.handle_pointer_up((offset, offset)),
            None => {
                let error = SessionError::PositionOutOfRange { line, column };
                log_error!(error.error_code(), &error.to_string());
                Err(error)
            }
        }
    }

    // ========================================================================
    // DEBOUNCED WORK
    // ========================================================================

    /// Fire whatever debounced work is due at the clock's current time
    pub fn tick(&mut self) -> TickOutcome {
        let id = self.id;
        with_session_context(id, || {
            let now = self.clock.now_ms();
            let mut outcome = TickOutcome::default();

            if let Some(generation) = self.eval_debouncer.poll(now) {
                if generation == self.generation {
                    outcome.dispatched = self.dispatch_eval();
                }
            }

            let live: BTreeSet<usize> = self.output.errors().map(|t| t.start.offset).collect();
            for offset in self.reveal_debouncer.poll(now) {
                if live.contains(&offset) && self.revealed.insert(offset) {
                    outcome.revealed.push(offset);
                }
            }

            outcome
        })
    }

    /// Deliver results for an earlier request; returns whether they were applied.
    /// Results for a render that has since been replaced are discarded.
    pub fn apply_eval_results(&mut self, request_id: u64, results: Vec<EvalResult>) -> bool {
        let id = self.id;
        with_session_context(id, || {
            let Some(pending) = self.pending.remove(&request_id) else {
                if request_id < self.next_request_id {
                    log_warning!(code = codes::eval::STALE_RESULTS_DISCARDED,
                        "Discarded results for a superseded render",
                        "request" => request_id
                    );
                } else {
                    log_warning!(code = codes::eval::UNKNOWN_REQUEST,
                        "Results for an unknown evaluation request",
                        "request" => request_id
                    );
                }
                return false;
            };

            if pending.generation != self.generation {
                log_warning!(code = codes::eval::STALE_RESULTS_DISCARDED,
                    "Discarded results for a superseded render",
                    "request" => request_id,
                    "generation" => pending.generation
                );
                return false;
            }

            if results.len() != pending.forms.len() {
                log_warning!(code = codes::eval::RESULT_COUNT_MISMATCH,
                    "Result count does not match form count",
                    "expected" => pending.forms.len(),
                    "received" => results.len()
                );
            }

            self.annotations = annotate(&pending.forms, &results);
            log_success!(codes::success::EVAL_RESULTS_APPLIED,
                "Evaluation results applied",
                "request" => request_id,
                "results" => self.annotations.len()
            );
            true
        })
    }

    /// Tear the session down
    pub fn destroy(self) {
        with_session_context(self.id, || {
            log_success!(codes::success::SESSION_DESTROYED,
                "Editor session destroyed",
                "generation" => self.generation,
                "undo" => self.history.undo_len()
            );
        });
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn check_cursor(cursor: (usize, usize), len: usize) -> Result<(), SessionError> {
        let furthest = cursor.0.max(cursor.1);
        if furthest > len {
            let error = SessionError::CursorOutOfRange {
                cursor: furthest,
                len,
            };
            log_error!(error.error_code(), &error.to_string());
            return Err(error);
        }
        Ok(())
    }

    fn state_from(&self, text: &str, cursor: (usize, usize)) -> Result<EditorState, SessionError> {
        Self::check_cursor(cursor, text.chars().count())?;
        Ok(EditorState::new(text, cursor.0, cursor.1))
    }

    fn commit(&mut self, transition: Option<Transition>, now: u64) -> Option<Transition> {
        let transition = transition?;
        if transition.changes_text() {
            self.rerender(now);
        }
        let state = self.history.current();
        for hook in self.hooks.iter_mut() {
            hook(&self.output, state);
        }
        Some(transition)
    }

    fn rerender(&mut self, now: u64) {
        self.generation += 1;
        let mut output = pipeline::render(&self.history.current().text, &self.options);
        output.generation = self.generation;
        self.output = output;

        // Anything in flight targets the previous render
        self.pending.clear();
        self.revealed.clear();

        let live: BTreeSet<usize> = self.output.errors().map(|t| t.start.offset).collect();
        self.reveal_debouncer.retain(|offset| live.contains(offset));
        for offset in &live {
            self.reveal_debouncer.call(now, *offset);
        }

        self.schedule_eval(now);

        log_success!(codes::success::RENDER_COMPLETE,
            "Render complete",
            "generation" => self.generation,
            "tokens" => self.output.tokens.len(),
            "errors" => live.len()
        );
    }

    fn schedule_eval(&mut self, now: u64) {
        if self.config.runtime.eval.enabled && self.evaluator.is_some() {
            self.eval_debouncer.call(now, self.generation);
        }
    }

    fn dispatch_eval(&mut self) -> Option<u64> {
        let forms = self.output.eval_forms();
        let generation = self.generation;
        let request_id = self.next_request_id;
        let evaluator = self.evaluator.as_mut()?;

        if forms.is_empty() {
            self.annotations.clear();
            return None;
        }

        self.next_request_id += 1;
        let request = EvalRequest {
            id: request_id,
            generation,
            forms: forms.iter().map(|form| form.source.clone()).collect(),
        };

        match evaluator.evaluate(&request) {
            Ok(()) => {
                log_success!(codes::success::EVAL_DISPATCHED,
                    "Evaluation request dispatched",
                    "request" => request_id,
                    "forms" => forms.len()
                );
                self.pending.insert(request_id, PendingEval { generation, forms });
                Some(request_id)
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(), "request" => request_id);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, PaletteVariant};
    use crate::markup::strip_markup;
    use crate::session::events::Key;
    use crate::utils::ManualClock;
    use assert_matches::assert_matches;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn runtime() -> RuntimeConfig {
        let mut runtime = RuntimeConfig::default();
        runtime.history.coalesce_window_ms = 300;
        runtime.history.max_entries = 100;
        runtime.eval.enabled = true;
        runtime.eval.debounce_ms = 300;
        runtime.eval.error_reveal_delay_ms = 1000;
        runtime.render.base_depth = 0;
        runtime.render.palette = PaletteVariant::Classes;
        runtime.render.rainbow_delimiters = true;
        runtime
    }

    fn session(text: &str) -> (EditorSession, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(10_000));
        let config = SessionConfig::new("editor").with_runtime(runtime());
        let session = EditorSession::with_clock(config, text, clock.clone()).unwrap();
        (session, clock)
    }

    fn recording_evaluator() -> (Box<dyn Evaluator>, Rc<RefCell<Vec<EvalRequest>>>) {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let sink = requests.clone();
        let evaluator = move |request: &EvalRequest| {
            sink.borrow_mut().push(request.clone());
            Ok::<(), crate::eval::EvalError>(())
        };
        (Box::new(evaluator), requests)
    }

    fn type_text(session: &mut EditorSession, clock: &ManualClock, text: &str) {
        let len = text.chars().count();
        let last = text.chars().last().unwrap_or(' ');
        clock.advance(50);
        session
            .handle_key(&KeyEvent::character(last), text, (len, len))
            .unwrap();
    }

    #[test]
    fn test_missing_container_is_fatal() {
        let result = EditorSession::new(SessionConfig::default(), "(a)");
        assert_matches!(result, Err(SessionError::MissingContainer));

        let blank = EditorSession::new(SessionConfig::new("  "), "(a)");
        assert_matches!(blank, Err(SessionError::MissingContainer));
    }

    #[test]
    fn test_invalid_configuration_is_fatal() {
        let mut runtime = runtime();
        runtime.render.base_depth = 3;
        let result = EditorSession::new(SessionConfig::new("editor").with_runtime(runtime), "");
        assert_matches!(
            result,
            Err(SessionError::InvalidConfiguration(ConfigError::InvalidValue { .. }))
        );
    }

    #[test]
    fn test_initial_render() {
        let (session, _) = session("(foo [1 2] :bar");
        assert_eq!(session.state().text, "(foo [1 2] :bar)\n");
        assert_eq!(strip_markup(session.html()), "(foo [1 2] :bar)\n");
        assert_eq!(session.generation(), 1);
        assert_eq!(session.render_output().generation, 1);
        assert!(session.html().contains("class='vector rainbow-1'"));
    }

    #[test]
    fn test_typing_burst_undoes_as_one_step() {
        let (mut session, clock) = session("");
        type_text(&mut session, &clock, "a");
        type_text(&mut session, &clock, "ab");
        type_text(&mut session, &clock, "abc");
        assert_eq!(session.state().text, "abc\n");
        assert_eq!(session.history().undo_len(), 1);

        let undo = KeyEvent::character('z').with_ctrl();
        let transition = session.handle_key(&undo, "abc\n", (3, 3)).unwrap();
        assert_eq!(transition, Some(Transition::Undo));
        assert_eq!(session.state().text, "\n");

        let redo = KeyEvent::character('Z').with_ctrl().with_shift();
        session.handle_key(&redo, "\n", (0, 0)).unwrap();
        assert_eq!(session.state().text, "abc\n");
        assert_eq!(strip_markup(session.html()), "abc\n");
    }

    #[test]
    fn test_edit_after_undo_clears_redo() {
        let (mut session, _) = session("");
        session.edit("(a)", (3, 3), None).unwrap();
        session.undo();
        session.edit("(b)", (3, 3), None).unwrap();
        assert_eq!(session.redo(), None);
        assert_eq!(session.state().text, "(b)\n");
    }

    #[test]
    fn test_enter_reindents_cursor_line() {
        let (mut session, _) = session("(let [x 1]");
        assert_eq!(session.state().text, "(let [x 1])\n");

        let transition = session
            .handle_key(&KeyEvent::new(Key::Enter), "(let [x 1]\n)\n", (11, 11))
            .unwrap();
        assert_eq!(transition, Some(Transition::Edit));
        assert_eq!(session.state().text, "(let [x 1]\n  )\n");
        let position = session.cursor_position();
        assert_eq!((position.line, position.column), (2, 3));
        let (start, end) = session.selection_positions();
        assert_eq!(start, position);
        assert_eq!(end, position);

        session.move_cursor(2, 12).unwrap();
        let (start, end) = session.selection_positions();
        assert_eq!((start.line, start.column), (1, 3));
        assert_eq!((end.line, end.column), (2, 2));
    }

    #[test]
    fn test_tab_and_shift_tab() {
        let (mut session, _) = session("a");
        session.handle_key(&KeyEvent::new(Key::Tab), "a\n", (0, 0)).unwrap();
        assert_eq!(session.state().text, "  a\n");

        let back = KeyEvent::new(Key::Tab).with_shift();
        session.handle_key(&back, "  a\n", (2, 2)).unwrap();
        assert_eq!(session.state().text, "a\n");
        assert_eq!(session.state().cursor_start, 0);
    }

    #[test]
    fn test_cursor_moves_run_hooks_without_render() {
        let (mut session, _) = session("(a b)");
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        session.on_render(Box::new(move |output: &RenderOutput, state: &EditorState| {
            sink.borrow_mut().push((output.generation, state.cursor_start));
        }));

        session
            .handle_key(&KeyEvent::new(Key::ArrowRight), "(a b)\n", (2, 2))
            .unwrap();
        session.handle_pointer_up((1, 4)).unwrap();
        assert_eq!(*calls.borrow(), vec![(1, 2), (1, 1)]);
        assert_eq!(session.state().cursor_end, 4);
        assert_eq!(session.generation(), 1);

        session.edit("(a b c)", (6, 6), None).unwrap();
        assert_eq!(calls.borrow().last(), Some(&(2, 6)));
    }

    #[test]
    fn test_cursor_out_of_range() {
        let (mut session, _) = session("ab");
        let result = session.handle_key(&KeyEvent::character('x'), "abx", (9, 9));
        assert_matches!(result, Err(SessionError::CursorOutOfRange { cursor: 9, len: 3 }));
        assert_matches!(
            session.handle_pointer_up((0, 40)),
            Err(SessionError::CursorOutOfRange { .. })
        );
        assert_eq!(session.state().text, "ab\n");
    }

    #[test]
    fn test_move_cursor_to_line_and_column() {
        let (mut session, _) = session("(a)\n(b)");
        assert_eq!(session.state().text, "(a)\n(b)\n");
        let transition = session.move_cursor_to(2, 3).unwrap();
        assert_eq!(transition, Transition::CursorMove);
        assert_eq!((session.state().cursor_start, session.state().cursor_end), (6, 6));
        let position = session.cursor_position();
        assert_eq!((position.line, position.column), (2, 3));

        assert_matches!(
            session.move_cursor_to(2, 40),
            Err(SessionError::PositionOutOfRange { line: 2, column: 40 })
        );
        assert_matches!(
            session.move_cursor_to(0, 1),
            Err(SessionError::PositionOutOfRange { .. })
        );
        assert_eq!(session.state().cursor_start, 6);
    }

    #[test]
    fn test_clipboard_is_structural() {
        let (mut session, _) = session("");
        let transition = session.handle_clipboard("(do\nx", (5, 5)).unwrap();
        assert_eq!(transition, Transition::StructuralEdit);
        assert_eq!(session.state().text, "(do\n  x)\n");
    }

    #[test]
    fn test_eval_is_debounced_to_latest_input() {
        let (mut session, clock) = session("");
        let (evaluator, requests) = recording_evaluator();
        session.set_evaluator(evaluator);

        session.edit("(inc 1)", (0, 0), None).unwrap();
        clock.advance(200);
        session.edit("(inc 2)", (0, 0), None).unwrap();
        clock.advance(200);
        assert_eq!(session.tick().dispatched, None);

        clock.advance(100);
        let outcome = session.tick();
        assert_eq!(outcome.dispatched, Some(1));
        assert_eq!(requests.borrow().len(), 1);
        assert_eq!(requests.borrow()[0].forms, vec!["(inc 2)".to_string()]);

        clock.advance(1000);
        assert_eq!(session.tick().dispatched, None);
    }

    #[test]
    fn test_stale_results_are_discarded() {
        let (mut session, clock) = session("(+ 1 2)");
        let (evaluator, _requests) = recording_evaluator();
        session.set_evaluator(evaluator);

        clock.advance(300);
        let first = session.tick().dispatched.unwrap();

        session.edit("(+ 1 2)\n(+ 3 4)", (0, 0), None).unwrap();
        assert!(!session.apply_eval_results(first, vec![EvalResult::Value("3".into())]));
        assert!(session.annotations().is_empty());

        clock.advance(300);
        let second = session.tick().dispatched.unwrap();
        let applied = session.apply_eval_results(
            second,
            vec![EvalResult::Value("3".into()), EvalResult::Error("nope".into())],
        );
        assert!(applied);
        assert_eq!(session.annotations().len(), 2);
        assert_eq!(session.annotations()[1].line, 2);
        assert!(session.eval_html().contains("class='result error'"));

        assert!(!session.apply_eval_results(99, vec![]));
    }

    #[test]
    fn test_error_reveal_waits_for_pause() {
        let (mut session, clock) = session("");
        type_text(&mut session, &clock, "(foo");
        assert_eq!(session.render_output().error_count(), 1);

        clock.advance(999);
        assert!(session.tick().revealed.is_empty());
        clock.advance(1);
        assert_eq!(session.tick().revealed, vec![0]);
        assert_eq!(session.revealed_errors(), vec![0]);

        type_text(&mut session, &clock, "(foo)");
        assert!(session.revealed_errors().is_empty());
        clock.advance(2000);
        assert!(session.tick().revealed.is_empty());
    }

    #[test]
    fn test_destroy_consumes_session() {
        let (session, _) = session("(a)");
        let id = session.id();
        session.destroy();
        let (next, _) = self::session("");
        assert!(next.id() > id);
    }
}
