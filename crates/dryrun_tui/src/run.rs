//! TUI run loop: terminal setup, key handling, draw. Talks to the runtime over channels.
//!
//! Key events are read in a dedicated thread so the main loop never blocks on terminal
//! input; the UI keeps animating while a remote call is in flight.

use std::io;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use dryrun_core::{default_export_path, write_report, SessionEvent};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc as tokio_mpsc;
use tokio_util::sync::CancellationToken;

use crate::runtime_events::apply_session_event;
use crate::state::{Screen, Tab, TuiState};
use crate::theme::Appearance;
use crate::view;

/// One validated submission from the editors.
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub code: String,
    pub test_case: String,
    /// Cancelled by Ctrl+C, possibly before the runtime has picked the input up.
    pub cancel: CancellationToken,
}

/// Senders from the TUI to the runtime task.
#[derive(Debug, Clone)]
pub struct TuiChannels {
    pub request_tx: tokio_mpsc::Sender<AnalysisInput>,
    /// Ctrl+N: drop the current session.
    pub new_session_tx: Option<tokio_mpsc::Sender<()>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Run the TUI against a runtime: [SessionEvent]s arrive on `event_rx`, Ctrl+R sends
/// an [AnalysisInput] on `request_tx`. Lines on `log_rx` go to the logs screen (Ctrl+D).
pub fn run_tui_with_runtime(
    mut event_rx: tokio_mpsc::Receiver<SessionEvent>,
    request_tx: tokio_mpsc::Sender<AnalysisInput>,
    log_rx: Option<tokio_mpsc::Receiver<String>>,
    new_session_tx: Option<tokio_mpsc::Sender<()>>,
    appearance: Appearance,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = TuiState::with_appearance(appearance);
    state.push_trace_line("[log] TUI started. Runtime logs show tracing output.".to_string());
    let channels = TuiChannels {
        request_tx,
        new_session_tx,
    };
    let result = run_loop(&mut terminal, &mut state, &mut event_rx, log_rx, &channels);

    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    disable_raw_mode()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut TuiState,
    event_rx: &mut tokio_mpsc::Receiver<SessionEvent>,
    mut log_rx: Option<tokio_mpsc::Receiver<String>>,
    channels: &TuiChannels,
) -> anyhow::Result<()> {
    let (key_tx, key_rx) = mpsc::channel();
    let _reader = std::thread::spawn(move || {
        loop {
            if event::poll(Duration::from_millis(50)).unwrap_or(false)
                && let Ok(ev) = event::read()
                && key_tx.send(ev).is_err()
            {
                break;
            }
        }
    });

    loop {
        if let Some(ref mut rx) = log_rx {
            while let Ok(line) = rx.try_recv() {
                for l in line.split('\n') {
                    state.push_trace_line(l.to_string());
                }
            }
        }
        while let Ok(event) = event_rx.try_recv() {
            apply_session_event(state, event);
        }

        if !state.status_permanent
            && let Some(set_at) = state.status_set_at
            && set_at.elapsed() > STATUS_TIMEOUT
        {
            state.clear_status();
        }

        if state.needs_redraw || state.is_busy {
            state.frame_count = state.frame_count.wrapping_add(1);
            terminal.draw(|f| view::draw(f, state, f.area()))?;
            state.needs_redraw = false;
        }

        match key_rx.try_recv() {
            Ok(Event::Key(key)) => {
                if key.kind == KeyEventKind::Press && handle_key(state, key, channels) == KeyOutcome::Quit {
                    break;
                }
            }
            Ok(Event::Paste(text)) => handle_paste(state, &text),
            Ok(Event::Mouse(me)) => match me.kind {
                MouseEventKind::ScrollUp => scroll(state, -3),
                MouseEventKind::ScrollDown => scroll(state, 3),
                _ => {}
            },
            Ok(Event::Resize(_, _)) => state.needs_redraw = true,
            Ok(_) => {}
            Err(_) => std::thread::sleep(Duration::from_millis(30)),
        }
    }
    Ok(())
}

/// Positive `lines` scrolls toward newer content.
fn scroll(state: &mut TuiState, lines: isize) {
    let n = lines.unsigned_abs();
    match (state.screen, state.tab, lines > 0) {
        (Screen::DebugTraces, _, true) => state.trace_scroll_down(n),
        (Screen::DebugTraces, _, false) => state.trace_scroll_up(n),
        (Screen::Main, Tab::Results, true) => state.results_scroll_down(n),
        (Screen::Main, Tab::Results, false) => state.results_scroll_up(n),
        (Screen::Main, Tab::CodeInput, _) => {}
    }
}

fn handle_paste(state: &mut TuiState, text: &str) {
    if state.screen == Screen::Main && state.tab == Tab::CodeInput && !state.is_busy {
        state.focused_editor().insert_str(text);
        state.needs_redraw = true;
    }
}

/// Apply one key press. Returns [KeyOutcome::Quit] when the TUI should exit.
pub fn handle_key(state: &mut TuiState, key: KeyEvent, channels: &TuiChannels) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    state.needs_redraw = true;

    match key.code {
        KeyCode::Char('q') if ctrl => return KeyOutcome::Quit,
        KeyCode::Char('c') if ctrl => return cancel_or_quit(state),
        KeyCode::Char('d') if ctrl => {
            state.screen = match state.screen {
                Screen::Main => Screen::DebugTraces,
                Screen::DebugTraces => Screen::Main,
            };
            return KeyOutcome::Continue;
        }
        _ => {}
    }

    if state.screen == Screen::DebugTraces {
        match key.code {
            KeyCode::Esc => state.screen = Screen::Main,
            KeyCode::Up => state.trace_scroll_up(1),
            KeyCode::Down => state.trace_scroll_down(1),
            KeyCode::PageUp => state.trace_scroll_up(10),
            KeyCode::PageDown => state.trace_scroll_down(10),
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    match key.code {
        KeyCode::F(1) => state.switch_tab(Tab::CodeInput),
        KeyCode::F(2) => state.switch_tab(Tab::Results),
        KeyCode::F(3) => state.show_debug_json = !state.show_debug_json,
        KeyCode::Char('r') if ctrl => submit(state, channels),
        KeyCode::Char('n') if ctrl => new_session(state, channels),
        KeyCode::Char('s') if ctrl => match std::env::current_dir() {
            Ok(dir) => export_latest(state, &dir),
            Err(e) => state.set_error(format!("Export failed: {e}")),
        },
        KeyCode::Char('y') if ctrl => copy_narrative(state),
        _ => match state.tab {
            Tab::CodeInput => edit(state, key),
            Tab::Results => match key.code {
                KeyCode::Up => state.results_scroll_up(1),
                KeyCode::Down => state.results_scroll_down(1),
                KeyCode::PageUp => state.results_scroll_up(10),
                KeyCode::PageDown => state.results_scroll_down(10),
                KeyCode::Home => state.results_scroll_up(usize::MAX),
                KeyCode::End => state.results_scroll_down(usize::MAX),
                _ => {}
            },
        },
    }
    KeyOutcome::Continue
}

/// First Ctrl+C while busy cancels the in-flight analysis; otherwise quit.
fn cancel_or_quit(state: &mut TuiState) -> KeyOutcome {
    if !state.is_busy || state.cancel_requested {
        return KeyOutcome::Quit;
    }
    match state.cancel.take() {
        Some(token) => {
            token.cancel();
            state.cancel_requested = true;
            state.set_status("Cancelling… (Ctrl+C again to quit)");
            state.status_permanent = true;
            KeyOutcome::Continue
        }
        None => KeyOutcome::Quit,
    }
}

fn submit(state: &mut TuiState, channels: &TuiChannels) {
    if state.is_busy {
        state.set_status("An analysis is already running");
        return;
    }
    let request = match state.submission() {
        Ok(request) => request,
        Err(e) => {
            state.set_error(capitalize(&e.to_string()));
            return;
        }
    };
    let cancel = CancellationToken::new();
    let input = AnalysisInput {
        code: request.code().to_string(),
        test_case: request.test_case().to_string(),
        cancel: cancel.clone(),
    };
    match channels.request_tx.try_send(input) {
        Ok(()) => {
            state.begin_submission();
            state.cancel = Some(cancel);
        }
        Err(_) => state.set_error("The analysis runtime is not available"),
    }
}

fn new_session(state: &mut TuiState, channels: &TuiChannels) {
    if state.is_busy {
        state.set_status("Wait for the running analysis or cancel it first (Ctrl+C)");
        return;
    }
    if let Some(tx) = &channels.new_session_tx {
        let _ = tx.try_send(());
    }
    state.reset_session();
}

/// Writes the latest raw response as a text report in `dir`.
pub fn export_latest(state: &mut TuiState, dir: &Path) {
    let Some(record) = &state.latest else {
        state.set_status("Nothing to export yet");
        return;
    };
    let path = default_export_path(dir);
    match write_report(&path, record.raw_text()) {
        Ok(bytes) => state.set_status(format!("Exported {bytes} bytes to {}", path.display())),
        Err(e) => state.set_error(format!("Export failed: {e}")),
    }
}

fn copy_narrative(state: &mut TuiState) {
    let Some(text) = state.latest.as_ref().map(|r| r.result.narrative.clone()) else {
        return;
    };
    if text.trim().is_empty() {
        return;
    }
    match cli_clipboard::set_contents(text) {
        Ok(()) => state.set_status("Copied to clipboard"),
        Err(e) => state.set_error(format!("Clipboard unavailable: {e}")),
    }
}

fn edit(state: &mut TuiState, key: KeyEvent) {
    if state.is_busy {
        return;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::BackTab => state.toggle_focus(),
        KeyCode::Tab => state.focused_editor().insert_tab(),
        KeyCode::Char('u') if ctrl => state.focused_editor().clear_line(),
        KeyCode::Char(_) if ctrl => {}
        KeyCode::Char(c) => state.focused_editor().insert_char(c),
        KeyCode::Enter => state.focused_editor().newline(),
        KeyCode::Backspace => state.focused_editor().backspace(),
        KeyCode::Delete => state.focused_editor().delete(),
        KeyCode::Left => state.focused_editor().left(),
        KeyCode::Right => state.focused_editor().right(),
        KeyCode::Up => state.focused_editor().up(),
        KeyCode::Down => state.focused_editor().down(),
        KeyCode::Home => state.focused_editor().home(),
        KeyCode::End => state.focused_editor().end(),
        _ => {}
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextEditor;
    use dryrun_core::{AnalysisRecord, AnalysisRequest, AnalysisResponse, ResponseExtractor};
    use tempfile::tempdir;

    struct Harness {
        channels: TuiChannels,
        request_rx: tokio_mpsc::Receiver<AnalysisInput>,
        new_session_rx: tokio_mpsc::Receiver<()>,
    }

    fn harness() -> Harness {
        let (request_tx, request_rx) = tokio_mpsc::channel(4);
        let (new_session_tx, new_session_rx) = tokio_mpsc::channel(4);
        Harness {
            channels: TuiChannels {
                request_tx,
                new_session_tx: Some(new_session_tx),
            },
            request_rx,
            new_session_rx,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn filled_state() -> TuiState {
        let mut state = TuiState::new();
        state.code = TextEditor::with_text("def f(x): return x + 1");
        state.test_case = TextEditor::with_text("f(2)");
        state
    }

    #[test]
    fn typing_goes_to_focused_editor() {
        let h = harness();
        let mut state = TuiState::new();
        for c in "x = 1".chars() {
            handle_key(&mut state, key(KeyCode::Char(c)), &h.channels);
        }
        handle_key(&mut state, key(KeyCode::Enter), &h.channels);
        handle_key(&mut state, key(KeyCode::Tab), &h.channels);
        handle_key(&mut state, key(KeyCode::BackTab), &h.channels);
        handle_key(&mut state, key(KeyCode::Char('t')), &h.channels);
        assert_eq!(state.code.text(), "x = 1\n    ");
        assert_eq!(state.test_case.text(), "t");
    }

    #[test]
    fn ctrl_r_sends_validated_input() {
        let mut h = harness();
        let mut state = filled_state();
        handle_key(&mut state, ctrl('r'), &h.channels);
        let sent = h.request_rx.try_recv().unwrap();
        assert_eq!(sent.code, "def f(x): return x + 1");
        assert_eq!(sent.test_case, "f(2)");
        assert!(state.is_busy);
    }

    #[test]
    fn ctrl_r_with_missing_input_sends_nothing() {
        let mut h = harness();
        let mut state = TuiState::new();
        state.code = TextEditor::with_text("x = 1");
        handle_key(&mut state, ctrl('r'), &h.channels);
        assert!(h.request_rx.try_recv().is_err());
        assert!(!state.is_busy);
        assert!(state.status_is_error);
        assert_eq!(state.status, "A test case is required to perform the analysis");
    }

    #[test]
    fn ctrl_r_while_busy_is_refused() {
        let mut h = harness();
        let mut state = filled_state();
        handle_key(&mut state, ctrl('r'), &h.channels);
        handle_key(&mut state, ctrl('r'), &h.channels);
        assert!(h.request_rx.try_recv().is_ok());
        assert!(h.request_rx.try_recv().is_err());
    }

    #[test]
    fn editing_is_locked_while_busy() {
        let h = harness();
        let mut state = filled_state();
        state.begin_submission();
        handle_key(&mut state, key(KeyCode::Char('z')), &h.channels);
        assert_eq!(state.test_case.text(), "f(2)");
    }

    #[test]
    fn ctrl_c_cancels_then_quits() {
        let mut h = harness();
        let mut state = filled_state();
        handle_key(&mut state, ctrl('r'), &h.channels);
        let sent = h.request_rx.try_recv().unwrap();
        assert!(!sent.cancel.is_cancelled());

        assert_eq!(handle_key(&mut state, ctrl('c'), &h.channels), KeyOutcome::Continue);
        assert!(sent.cancel.is_cancelled());
        assert!(state.cancel_requested);

        assert_eq!(handle_key(&mut state, ctrl('c'), &h.channels), KeyOutcome::Quit);
    }

    #[test]
    fn ctrl_c_when_idle_quits() {
        let h = harness();
        let mut state = TuiState::new();
        assert_eq!(handle_key(&mut state, ctrl('c'), &h.channels), KeyOutcome::Quit);
        assert_eq!(handle_key(&mut state, ctrl('q'), &h.channels), KeyOutcome::Quit);
    }

    #[test]
    fn ctrl_n_resets_and_notifies_runtime() {
        let mut h = harness();
        let mut state = filled_state();
        handle_key(&mut state, ctrl('n'), &h.channels);
        assert!(h.new_session_rx.try_recv().is_ok());
        assert!(state.code.is_blank());
    }

    #[test]
    fn function_keys_switch_tabs() {
        let h = harness();
        let mut state = TuiState::new();
        handle_key(&mut state, key(KeyCode::F(2)), &h.channels);
        assert_eq!(state.tab, Tab::Results);
        handle_key(&mut state, key(KeyCode::F(3)), &h.channels);
        assert!(state.show_debug_json);
        handle_key(&mut state, key(KeyCode::F(1)), &h.channels);
        assert_eq!(state.tab, Tab::CodeInput);
    }

    #[test]
    fn logs_screen_toggles() {
        let h = harness();
        let mut state = TuiState::new();
        handle_key(&mut state, ctrl('d'), &h.channels);
        assert_eq!(state.screen, Screen::DebugTraces);
        handle_key(&mut state, key(KeyCode::Char('x')), &h.channels);
        assert!(state.code.is_blank());
        handle_key(&mut state, key(KeyCode::Esc), &h.channels);
        assert_eq!(state.screen, Screen::Main);
    }

    #[test]
    fn paste_inserts_into_focused_editor() {
        let mut state = TuiState::new();
        handle_paste(&mut state, "a\r\nb");
        assert_eq!(state.code.text(), "a\nb");
    }

    #[test]
    fn export_writes_raw_response() {
        let dir = tempdir().unwrap();
        let mut state = TuiState::new();
        export_latest(&mut state, dir.path());
        assert_eq!(state.status, "Nothing to export yet");

        let raw = "Step 1: x = 1\nSUMMARY_JSON: {\"execution_steps\": 1}";
        state.latest = Some(AnalysisRecord::new(
            AnalysisRequest::new("x = 1", "none").unwrap(),
            AnalysisResponse::new(raw, "gemini", "gemini-2.0-flash"),
            ResponseExtractor::new().extract(raw),
        ));
        export_latest(&mut state, dir.path());
        let written = std::fs::read_to_string(dir.path().join("code_analysis_report.txt")).unwrap();
        assert_eq!(written, raw);
        assert!(state.status.starts_with("Exported"));
    }
}
