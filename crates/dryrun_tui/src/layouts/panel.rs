//! Bordered, titled panel block with focus highlight.

use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders};

use super::style::{background_style, border_focused_style, border_style, text_muted_style, text_style};
use crate::theme::DryrunPalette;

/// Rounded panel with ` title ` in the top border. The focused panel uses the
/// accent border and title color.
pub fn block_for_panel(title: &str, palette: &DryrunPalette, focused: bool) -> Block<'static> {
    let (border, title_style) = if focused {
        (border_focused_style(palette.border_focused), text_style(palette.accent))
    } else {
        (border_style(palette.border), text_muted_style(palette.text_muted))
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(Line::from(Span::styled(format!(" {} ", title), title_style)))
        .style(background_style(palette.surface_background))
}
