//! Header strip: title and provider on the left, status with a colored dot
//! (or the busy spinner) on the right.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use super::style::{background_style, border_style, danger_style, success_style, text_muted_style, text_style, warning_style};
use crate::theme::DryrunPalette;
use crate::utils::{horizontal_padding, truncate_ellipsis};

/// Status shown when nothing else is set.
pub const HEADER_STATUS_READY: &str = "Ready";

#[derive(Debug, Clone, Copy)]
pub struct HeaderState<'a> {
    pub title: &'a str,
    /// Provider and model, shown muted after the title.
    pub subtitle: &'a str,
    pub status: &'a str,
    /// Spinner frame replacing the dot while an analysis runs.
    pub spinner: Option<&'a str>,
    pub error: bool,
}

/// Title (bold) left, then right-aligned `● status`. Red dot on error, the
/// spinner while busy, green otherwise. The status is cut to fit `width`.
pub fn header_line(header: &HeaderState<'_>, palette: &DryrunPalette, width: u16) -> Line<'static> {
    let width = width as usize;
    let (marker, marker_style) = match (header.error, header.spinner) {
        (true, _) => ("●".to_string(), danger_style(palette.danger)),
        (false, Some(frame)) => (frame.to_string(), warning_style(palette.warning)),
        (false, None) => ("●".to_string(), success_style(palette.success)),
    };

    let mut left = vec![Span::styled(
        header.title.to_string(),
        text_style(palette.accent).add_modifier(Modifier::BOLD),
    )];
    let mut left_w = header.title.width();
    if !header.subtitle.is_empty() {
        let sub = format!("  {}", header.subtitle);
        left_w += sub.width();
        left.push(Span::styled(sub, text_muted_style(palette.text_muted)));
    }

    let room = width.saturating_sub(left_w + 3);
    let status = truncate_ellipsis(header.status, room);
    let right_w = marker.width() + 1 + status.width();
    let gap = width.saturating_sub(left_w + right_w).max(1);

    left.push(Span::raw(" ".repeat(gap)));
    left.push(Span::styled(marker, marker_style));
    left.push(Span::raw(" "));
    let status_style = if header.error {
        danger_style(palette.danger)
    } else {
        text_muted_style(palette.text_muted)
    };
    left.push(Span::styled(status, status_style));
    Line::from(left)
}

/// Two-line header: content line, then a bottom border.
pub fn render_header(frame: &mut Frame, area: Rect, palette: &DryrunPalette, header: &HeaderState<'_>) {
    let bg = background_style(palette.status_bar_background);
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(border_style(palette.border))
        .style(bg);
    let inner = horizontal_padding(area);
    let line = header_line(header, palette, inner.width);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(line).style(bg), inner);
}
