//! Tab bar: `F1 Code Input` and `F2 Analysis Results`, active tab highlighted.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use super::style::{background_style, text_muted_style, text_style};
use crate::state::Tab;
use crate::theme::DryrunPalette;

/// One line with every tab; `has_results` adds a dot to the results tab.
pub fn tab_bar_line(active: Tab, has_results: bool, palette: &DryrunPalette) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        let mut label = format!(" {} {} ", tab.key_hint(), tab.title());
        if *tab == Tab::Results && has_results {
            label.push_str("● ");
        }
        let style = if *tab == active {
            text_style(palette.accent)
                .patch(background_style(palette.tab_active_background))
                .add_modifier(Modifier::BOLD)
        } else {
            text_muted_style(palette.text_muted).patch(background_style(palette.tab_inactive_background))
        };
        spans.push(Span::styled(label, style));
        if i + 1 < Tab::ALL.len() {
            spans.push(Span::raw(" "));
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_bar_lists_both_tabs() {
        let palette = DryrunPalette::dark();
        let line = tab_bar_line(Tab::CodeInput, false, &palette);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("F1 Code Input"));
        assert!(text.contains("F2 Analysis Results"));
        assert!(!text.contains('●'));
    }

    #[test]
    fn results_dot_when_available() {
        let palette = DryrunPalette::dark();
        let line = tab_bar_line(Tab::CodeInput, true, &palette);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("Analysis Results ●"));
    }
}
