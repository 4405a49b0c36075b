//! TUI state: editors, active tab, latest analysis, status line, traces.
//!
//! [TuiState] holds everything the view needs to render. It never talks to the
//! runtime directly; the run loop feeds it [dryrun_core::SessionEvent]s and reads
//! submissions out of it.

use std::time::Instant;

use dryrun_core::{AnalysisRecord, AnalysisRequest};
use tokio_util::sync::CancellationToken;

use crate::editor::TextEditor;
use crate::theme::{Appearance, DryrunPalette};
use crate::utils::MAX_TRACE_LINES;

/// Which screen is currently shown (main view vs debug traces).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    DebugTraces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    CodeInput,
    Results,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::CodeInput, Tab::Results];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::CodeInput => "Code Input",
            Tab::Results => "Analysis Results",
        }
    }

    pub fn key_hint(&self) -> &'static str {
        match self {
            Tab::CodeInput => "F1",
            Tab::Results => "F2",
        }
    }
}

/// Editor that receives typed keys on the input tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Code,
    TestCase,
}

#[derive(Debug)]
pub struct TuiState {
    pub screen: Screen,
    pub tab: Tab,
    pub focus: Focus,
    pub code: TextEditor,
    pub test_case: TextEditor,
    pub palette: DryrunPalette,

    /// Header status text.
    pub status: String,
    /// When set, status is transient and auto-clears.
    pub status_set_at: Option<Instant>,
    pub status_permanent: bool,
    pub status_is_error: bool,

    /// True from submission until the analysis ends.
    pub is_busy: bool,
    /// Submitted but no `AnalysisStart` seen yet.
    pub pending_start: bool,
    pub cancel_requested: bool,
    /// Token of the in-flight submission; Ctrl+C cancels it.
    pub cancel: Option<CancellationToken>,
    /// `provider · model` of the current or last run.
    pub provider_label: String,
    pub busy_since: Option<Instant>,
    /// Narration received so far while streaming.
    pub streaming_text: String,

    pub latest: Option<AnalysisRecord>,
    pub last_error: Option<String>,
    /// Show the parsed summary block as JSON next to the chart.
    pub show_debug_json: bool,
    /// Lines scrolled down in the results narrative.
    pub results_scroll: usize,
    /// Height of the last rendered narrative, for scroll clamping.
    pub results_content_height: usize,
    pub results_viewport_height: usize,

    /// Debug trace lines. Newest at end.
    pub trace_lines: Vec<String>,
    /// Lines scrolled up from the bottom of the trace view.
    pub trace_scroll: usize,

    pub frame_count: u64,
    pub needs_redraw: bool,
}

impl Default for TuiState {
    fn default() -> Self {
        Self {
            screen: Screen::Main,
            tab: Tab::CodeInput,
            focus: Focus::Code,
            code: TextEditor::new(),
            test_case: TextEditor::new(),
            palette: DryrunPalette::dark(),
            status: String::new(),
            status_set_at: None,
            status_permanent: false,
            status_is_error: false,
            is_busy: false,
            pending_start: false,
            cancel_requested: false,
            cancel: None,
            provider_label: String::new(),
            busy_since: None,
            streaming_text: String::new(),
            latest: None,
            last_error: None,
            show_debug_json: false,
            results_scroll: 0,
            results_content_height: 0,
            results_viewport_height: 0,
            trace_lines: Vec::new(),
            trace_scroll: 0,
            frame_count: 0,
            needs_redraw: true,
        }
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_appearance(appearance: Appearance) -> Self {
        Self {
            palette: DryrunPalette::for_appearance(appearance),
            ..Self::default()
        }
    }

    /// Transient status that clears after a few seconds.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.status_set_at = Some(Instant::now());
        self.status_permanent = false;
        self.status_is_error = false;
        self.needs_redraw = true;
    }

    /// Error status; stays until replaced.
    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = message.clone();
        self.status_set_at = None;
        self.status_permanent = true;
        self.status_is_error = true;
        self.last_error = Some(message);
        self.needs_redraw = true;
    }

    pub fn clear_status(&mut self) {
        self.status.clear();
        self.status_set_at = None;
        self.status_permanent = false;
        self.status_is_error = false;
        self.needs_redraw = true;
    }

    pub fn focused_editor(&mut self) -> &mut TextEditor {
        match self.focus {
            Focus::Code => &mut self.code,
            Focus::TestCase => &mut self.test_case,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Code => Focus::TestCase,
            Focus::TestCase => Focus::Code,
        };
        self.needs_redraw = true;
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.needs_redraw = true;
        }
    }

    /// Validated submission from the editors.
    pub fn submission(&self) -> dryrun_core::Result<AnalysisRequest> {
        AnalysisRequest::new(self.code.text(), self.test_case.text())
    }

    /// Marks a submission as sent; the runtime confirms with `AnalysisStart`.
    pub fn begin_submission(&mut self) {
        self.is_busy = true;
        self.pending_start = true;
        self.cancel_requested = false;
        self.busy_since = Some(Instant::now());
        self.streaming_text.clear();
        self.last_error = None;
        self.status_is_error = false;
        self.set_status("Analyzing code…");
        self.status_permanent = true;
    }

    pub fn end_busy(&mut self) {
        self.is_busy = false;
        self.pending_start = false;
        self.cancel_requested = false;
        self.cancel = None;
        self.busy_since = None;
        self.streaming_text.clear();
        self.needs_redraw = true;
    }

    /// Drops the analysis and the inputs; the runtime starts a fresh session.
    pub fn reset_session(&mut self) {
        self.code.clear();
        self.test_case.clear();
        self.focus = Focus::Code;
        self.tab = Tab::CodeInput;
        self.latest = None;
        self.last_error = None;
        self.streaming_text.clear();
        self.results_scroll = 0;
        self.show_debug_json = false;
        self.set_status("New session");
    }

    /// Narrative to display: streamed text while running, else the latest result.
    pub fn narrative(&self) -> Option<&str> {
        if self.is_busy && !self.streaming_text.is_empty() {
            return Some(&self.streaming_text);
        }
        self.latest.as_ref().map(|r| r.result.narrative.as_str())
    }

    pub fn push_trace_line(&mut self, line: String) {
        self.trace_lines.push(line);
        if self.trace_lines.len() > MAX_TRACE_LINES {
            let excess = self.trace_lines.len() - MAX_TRACE_LINES;
            self.trace_lines.drain(..excess);
        }
        self.needs_redraw = true;
    }

    pub fn trace_scroll_up(&mut self, n: usize) {
        let max = self.trace_lines.len().saturating_sub(1);
        self.trace_scroll = self.trace_scroll.saturating_add(n).min(max);
        self.needs_redraw = true;
    }

    pub fn trace_scroll_down(&mut self, n: usize) {
        self.trace_scroll = self.trace_scroll.saturating_sub(n);
        self.needs_redraw = true;
    }

    fn results_max_scroll(&self) -> usize {
        self.results_content_height
            .saturating_sub(self.results_viewport_height)
    }

    pub fn results_scroll_down(&mut self, n: usize) {
        self.results_scroll = self.results_scroll.saturating_add(n).min(self.results_max_scroll());
        self.needs_redraw = true;
    }

    pub fn results_scroll_up(&mut self, n: usize) {
        self.results_scroll = self.results_scroll.saturating_sub(n);
        self.needs_redraw = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dryrun_core::{AnalysisResponse, ResponseExtractor};

    fn record(raw: &str) -> AnalysisRecord {
        AnalysisRecord::new(
            AnalysisRequest::new("x = 1", "x is 1").unwrap(),
            AnalysisResponse::new(raw, "gemini", "gemini-2.0-flash"),
            ResponseExtractor::new().extract(raw),
        )
    }

    #[test]
    fn submission_requires_both_inputs() {
        let mut state = TuiState::new();
        let err = state.submission().unwrap_err();
        assert!(err.is_input_error());

        state.code = TextEditor::with_text("print(1)");
        assert!(state.submission().is_err());

        state.test_case = TextEditor::with_text("no input");
        let request = state.submission().unwrap();
        assert_eq!(request.code(), "print(1)");
        assert_eq!(request.test_case(), "no input");
    }

    #[test]
    fn begin_submission_marks_busy() {
        let mut state = TuiState::new();
        state.last_error = Some("old".into());
        state.begin_submission();
        assert!(state.is_busy);
        assert!(state.pending_start);
        assert!(state.last_error.is_none());
        assert_eq!(state.status, "Analyzing code…");

        state.cancel = Some(CancellationToken::new());
        state.end_busy();
        assert!(!state.is_busy);
        assert!(state.busy_since.is_none());
        assert!(state.cancel.is_none());
    }

    #[test]
    fn error_status_is_permanent() {
        let mut state = TuiState::new();
        state.set_error("boom");
        assert!(state.status_permanent);
        assert!(state.status_is_error);
        assert_eq!(state.last_error.as_deref(), Some("boom"));
        state.set_status("ok");
        assert!(!state.status_is_error);
    }

    #[test]
    fn narrative_prefers_stream_while_busy() {
        let mut state = TuiState::new();
        state.latest = Some(record("Step 1: old"));
        assert_eq!(state.narrative(), Some("Step 1: old"));

        state.begin_submission();
        assert_eq!(state.narrative(), Some("Step 1: old"));
        state.streaming_text.push_str("Step 1: new");
        assert_eq!(state.narrative(), Some("Step 1: new"));
    }

    #[test]
    fn reset_session_clears_everything() {
        let mut state = TuiState::new();
        state.code = TextEditor::with_text("a");
        state.test_case = TextEditor::with_text("b");
        state.latest = Some(record("x"));
        state.tab = Tab::Results;
        state.reset_session();
        assert!(state.code.is_blank());
        assert!(state.test_case.is_blank());
        assert!(state.latest.is_none());
        assert_eq!(state.tab, Tab::CodeInput);
    }

    #[test]
    fn trace_lines_are_capped() {
        let mut state = TuiState::new();
        for i in 0..MAX_TRACE_LINES + 5 {
            state.push_trace_line(format!("line {i}"));
        }
        assert_eq!(state.trace_lines.len(), MAX_TRACE_LINES);
        assert_eq!(state.trace_lines[0], "line 5");
    }

    #[test]
    fn results_scroll_is_clamped() {
        let mut state = TuiState::new();
        state.results_content_height = 30;
        state.results_viewport_height = 10;
        state.results_scroll_down(100);
        assert_eq!(state.results_scroll, 20);
        state.results_scroll_up(5);
        assert_eq!(state.results_scroll, 15);
    }

    #[test]
    fn toggle_focus_switches_editor() {
        let mut state = TuiState::new();
        state.focused_editor().insert_char('x');
        state.toggle_focus();
        state.focused_editor().insert_char('y');
        assert_eq!(state.code.text(), "x");
        assert_eq!(state.test_case.text(), "y");
    }
}
