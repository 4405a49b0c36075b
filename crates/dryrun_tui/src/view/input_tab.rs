//! Code Input tab: code editor (line numbers, highlighting) above the test-case editor.

use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::editor::TextEditor;
use crate::layouts::{block_for_panel, text_muted_style, text_style};
use crate::narrative::highlight_code;
use crate::state::{Focus, TuiState};
use crate::theme::DryrunPalette;
use crate::utils::percent_split;

const CODE_PLACEHOLDER: &str = "Paste or type the code to analyze…";
const TEST_PLACEHOLDER: &str = "Describe the test case: inputs, starting state, expected call…";

struct EditorView<'a> {
    title: &'a str,
    placeholder: &'a str,
    focused: bool,
    line_numbers: bool,
    show_cursor: bool,
}

pub(super) fn draw(frame: &mut Frame, state: &mut TuiState, area: Rect) {
    let (top, bottom) = percent_split(area, 65, 5);
    let editable = !state.is_busy;

    let code_view = EditorView {
        title: "Code",
        placeholder: CODE_PLACEHOLDER,
        focused: state.focus == Focus::Code,
        line_numbers: true,
        show_cursor: editable && state.focus == Focus::Code,
    };
    render_editor(frame, top, &mut state.code, &state.palette, &code_view);

    let test_view = EditorView {
        title: "Test Case",
        placeholder: TEST_PLACEHOLDER,
        focused: state.focus == Focus::TestCase,
        line_numbers: false,
        show_cursor: editable && state.focus == Focus::TestCase,
    };
    render_editor(frame, bottom, &mut state.test_case, &state.palette, &test_view);
}

fn render_editor(
    frame: &mut Frame,
    area: Rect,
    editor: &mut TextEditor,
    palette: &DryrunPalette,
    view: &EditorView<'_>,
) {
    let block = block_for_panel(view.title, palette, view.focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let viewport = inner.height as usize;
    editor.ensure_visible(viewport);

    let gutter_w = if view.line_numbers {
        editor.lines().len().to_string().len() + 3
    } else {
        1
    };
    let (cursor_row, _) = editor.cursor();

    let lines: Vec<Line> = if editor.lines().len() == 1 && editor.lines()[0].is_empty() {
        vec![Line::from(vec![
            Span::raw(" ".repeat(gutter_w)),
            Span::styled(view.placeholder.to_string(), text_muted_style(palette.text_placeholder)),
        ])]
    } else {
        editor
            .lines()
            .iter()
            .enumerate()
            .skip(editor.scroll)
            .take(viewport)
            .map(|(i, line)| {
                let mut spans = Vec::new();
                if view.line_numbers {
                    let num_style = if i == cursor_row && view.focused {
                        text_style(palette.text)
                    } else {
                        text_muted_style(palette.editor_line_number)
                    };
                    spans.push(Span::styled(
                        format!(" {:>w$} │", i + 1, w = gutter_w - 3),
                        num_style,
                    ));
                    spans.push(Span::raw(" "));
                    spans.extend(highlight_code(line, palette));
                } else {
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(line.clone(), text_style(palette.editor_foreground)));
                }
                let mut rendered = Line::from(spans);
                if i == cursor_row && view.focused {
                    rendered = rendered.style(Style::default().bg(palette.editor_active_line.color()));
                }
                rendered
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), inner);

    if view.show_cursor {
        let (row, col) = editor.cursor();
        let line = &editor.lines()[row];
        let x = inner.x as usize + gutter_w + line[..col].width();
        let y = inner.y as usize + row.saturating_sub(editor.scroll);
        let max_x = inner.x as usize + inner.width as usize - 1;
        frame.set_cursor_position(Position::new(x.min(max_x) as u16, y as u16));
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::TextEditor;
    use crate::state::{Focus, TuiState};
    use crate::view::tests::render_to_string;

    #[test]
    fn empty_editors_show_placeholders() {
        let mut state = TuiState::new();
        let screen = render_to_string(&mut state, 100, 30);
        assert!(screen.contains("Paste or type the code"));
        assert!(screen.contains("Describe the test case"));
    }

    #[test]
    fn code_gets_line_numbers() {
        let mut state = TuiState::new();
        state.code = TextEditor::with_text("a = 1\nb = 2\nc = 3");
        let screen = render_to_string(&mut state, 80, 24);
        assert!(screen.contains("1 │ a = 1"));
        assert!(screen.contains("3 │ c = 3"));
    }

    #[test]
    fn long_code_scrolls_to_cursor() {
        let mut state = TuiState::new();
        let text: Vec<String> = (1..=60).map(|i| format!("line_{i} = {i}")).collect();
        state.code = TextEditor::with_text(&text.join("\n"));
        state.focus = Focus::Code;
        let screen = render_to_string(&mut state, 80, 24);
        assert!(screen.contains("line_60 = 60"));
        assert!(!screen.contains("line_1 = 1 "));
        assert!(state.code.scroll > 0);
    }
}
