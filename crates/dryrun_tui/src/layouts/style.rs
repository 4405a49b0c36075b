//! Map theme palette colors to ratatui styles.

use ratatui::style::Style;

use crate::theme::Rgb;

pub fn border_style(border: Rgb) -> Style {
    Style::default().fg(border.color())
}

pub fn border_focused_style(border_focused: Rgb) -> Style {
    Style::default().fg(border_focused.color())
}

pub fn background_style(bg: Rgb) -> Style {
    Style::default().bg(bg.color())
}

pub fn text_style(text: Rgb) -> Style {
    Style::default().fg(text.color())
}

pub fn text_muted_style(text_muted: Rgb) -> Style {
    Style::default().fg(text_muted.color())
}

pub fn success_style(success: Rgb) -> Style {
    Style::default().fg(success.color())
}

pub fn danger_style(danger: Rgb) -> Style {
    Style::default().fg(danger.color())
}

pub fn warning_style(warning: Rgb) -> Style {
    Style::default().fg(warning.color())
}
