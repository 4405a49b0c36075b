//! TUI view: header and tab bar on top, active tab in the body, shortcuts at the bottom.

mod input_tab;
mod logs;
mod results_tab;

use dryrun_constant::app;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::animation::Spinner;
use crate::layouts::{
    background_style, main_splits, render_header, shortcut_line, tab_bar_line, HeaderState,
    ShortcutContext, HEADER_STATUS_READY,
};
use crate::state::{Screen, Tab, TuiState};

/// Draw the main view or the debug traces screen depending on `state.screen`.
pub fn draw(frame: &mut Frame, state: &mut TuiState, area: Rect) {
    match state.screen {
        Screen::DebugTraces => logs::draw_debug_traces(frame, state, area),
        Screen::Main => draw_main(frame, state, area),
    }
}

fn draw_main(frame: &mut Frame, state: &mut TuiState, area: Rect) {
    let splits = main_splits(area);
    frame.render_widget(
        Block::default().style(background_style(state.palette.background)),
        area,
    );

    let spinner = state.busy_since.filter(|_| state.is_busy).map(Spinner::started_at);
    let status = if state.status.is_empty() {
        HEADER_STATUS_READY
    } else {
        state.status.as_str()
    };
    let header = HeaderState {
        title: app::DISPLAY_NAME,
        subtitle: &state.provider_label,
        status,
        spinner: spinner.as_ref().map(Spinner::frame),
        error: state.status_is_error,
    };
    render_header(frame, splits.header, &state.palette, &header);

    let tabs = tab_bar_line(state.tab, state.latest.is_some(), &state.palette);
    frame.render_widget(Paragraph::new(tabs), splits.tabs);

    match state.tab {
        Tab::CodeInput => input_tab::draw(frame, state, splits.body),
        Tab::Results => results_tab::draw(frame, state, splits.body),
    }

    let ctx = ShortcutContext {
        screen: state.screen,
        tab: state.tab,
        busy: state.is_busy,
        cancel_requested: state.cancel_requested,
    };
    frame.render_widget(
        Paragraph::new(shortcut_line(&ctx, &state.palette))
            .style(background_style(state.palette.status_bar_background)),
        splits.footer,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextEditor;
    use dryrun_core::{AnalysisRecord, AnalysisRequest, AnalysisResponse, ResponseExtractor};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    pub(crate) fn render_to_string(state: &mut TuiState, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, state, f.area())).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn finished_state() -> TuiState {
        let raw = "Step 1: x is set to 2\nStep 2: the function returns 4\nSUMMARY_JSON:\n{\"execution_steps\": 2, \"variables_tracked\": 1, \"errors_found\": 0, \"optimization_suggestions\": 1}";
        let mut state = TuiState::new();
        state.latest = Some(AnalysisRecord::new(
            AnalysisRequest::new("def f(x): return x * 2", "f(2)").unwrap(),
            AnalysisResponse::new(raw, "gemini", "gemini-2.0-flash"),
            ResponseExtractor::new().extract(raw),
        ));
        state.tab = Tab::Results;
        state
    }

    #[test]
    fn input_tab_renders_both_editors() {
        let mut state = TuiState::new();
        state.code = TextEditor::with_text("def f(x):\n    return x * 2");
        let screen = render_to_string(&mut state, 100, 30);
        assert!(screen.contains("Code Analyzer Pro"));
        assert!(screen.contains("F1 Code Input"));
        assert!(screen.contains("return x * 2"));
        assert!(screen.contains("Test Case"));
        assert!(screen.contains("Ready"));
    }

    #[test]
    fn results_tab_renders_narrative_and_table() {
        let mut state = finished_state();
        let screen = render_to_string(&mut state, 120, 40);
        assert!(screen.contains("Step 1"));
        assert!(screen.contains("the function returns 4"));
        assert!(screen.contains("Execution Steps"));
        assert!(screen.contains("Code Analysis Summary"));
    }

    #[test]
    fn results_tab_without_analysis_shows_hint() {
        let mut state = TuiState::new();
        state.tab = Tab::Results;
        let screen = render_to_string(&mut state, 100, 30);
        assert!(screen.contains("No analysis yet"));
    }

    #[test]
    fn debug_json_toggle_shows_summary_block() {
        let mut state = finished_state();
        state.show_debug_json = true;
        let screen = render_to_string(&mut state, 120, 40);
        assert!(screen.contains("\"execution_steps\": 2"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut state = finished_state();
        render_to_string(&mut state, 10, 3);
        state.tab = Tab::CodeInput;
        render_to_string(&mut state, 10, 3);
        state.screen = Screen::DebugTraces;
        render_to_string(&mut state, 10, 3);
    }
}
