//! Runtime logs screen: tracing output, newest at the bottom. Ctrl+D or Esc closes.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::layouts::{background_style, border_style, danger_style, text_muted_style, warning_style};
use crate::state::TuiState;
use crate::utils::truncate_ellipsis;

pub(super) fn draw_debug_traces(frame: &mut Frame, state: &mut TuiState, area: Rect) {
    let palette = &state.palette;
    let block = Block::default()
        .title(" Runtime logs (Ctrl+D to close) ")
        .borders(Borders::ALL)
        .border_style(border_style(palette.border))
        .style(background_style(palette.background));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let viewport = inner.height as usize;
    let total = state.trace_lines.len();
    state.trace_scroll = state.trace_scroll.min(total.saturating_sub(viewport));
    let start = total.saturating_sub(viewport + state.trace_scroll);
    let width = inner.width as usize;

    let lines: Vec<Line> = state.trace_lines[start..]
        .iter()
        .take(viewport)
        .map(|raw| {
            let style = if raw.contains("ERROR") {
                danger_style(palette.danger)
            } else if raw.contains("WARN") {
                warning_style(palette.warning)
            } else {
                text_muted_style(palette.text_muted)
            };
            Line::from(Span::styled(truncate_ellipsis(raw, width), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use crate::state::{Screen, TuiState};
    use crate::view::tests::render_to_string;

    #[test]
    fn shows_newest_lines() {
        let mut state = TuiState::new();
        state.screen = Screen::DebugTraces;
        for i in 0..50 {
            state.push_trace_line(format!("INFO trace line {i}"));
        }
        let screen = render_to_string(&mut state, 60, 10);
        assert!(screen.contains("trace line 49"));
        assert!(!screen.contains("trace line 10 "));
    }

    #[test]
    fn scrolling_up_reveals_older_lines() {
        let mut state = TuiState::new();
        state.screen = Screen::DebugTraces;
        for i in 0..50 {
            state.push_trace_line(format!("INFO trace line {i}"));
        }
        state.trace_scroll_up(40);
        let screen = render_to_string(&mut state, 60, 10);
        assert!(screen.contains("trace line 2 "));
        assert!(!screen.contains("trace line 49"));
    }
}
