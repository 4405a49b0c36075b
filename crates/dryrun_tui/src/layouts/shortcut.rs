//! Shortcut hint line in the footer, chosen from what the user can do now.

use ratatui::text::{Line, Span};

use super::style::{text_muted_style, warning_style};
use crate::state::{Screen, Tab};
use crate::theme::DryrunPalette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutContext {
    pub screen: Screen,
    pub tab: Tab,
    pub busy: bool,
    pub cancel_requested: bool,
}

fn hint(ctx: &ShortcutContext) -> &'static str {
    if ctx.screen == Screen::DebugTraces {
        return "↑↓/PgUp/PgDn: scroll  ·  Esc/Ctrl+D: back";
    }
    if ctx.busy {
        return if ctx.cancel_requested {
            "Cancelling…  ·  Ctrl+C: quit"
        } else {
            "Analyzing…  ·  Ctrl+C: cancel  ·  F1/F2: tabs  ·  Ctrl+D: logs"
        };
    }
    match ctx.tab {
        Tab::CodeInput => {
            "Ctrl+R: run  ·  Shift+Tab: switch editor  ·  F2: results  ·  Ctrl+N: new session  ·  Ctrl+Q: quit"
        }
        Tab::Results => {
            "↑↓: scroll  ·  F3: debug JSON  ·  Ctrl+S: export  ·  Ctrl+Y: copy  ·  F1: input  ·  Ctrl+Q: quit"
        }
    }
}

pub fn shortcut_line(ctx: &ShortcutContext, palette: &DryrunPalette) -> Line<'static> {
    let style = if ctx.busy {
        warning_style(palette.warning)
    } else {
        text_muted_style(palette.text_muted)
    };
    Line::from(vec![Span::raw(" "), Span::styled(hint(ctx).to_string(), style)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(tab: Tab, busy: bool) -> ShortcutContext {
        ShortcutContext {
            screen: Screen::Main,
            tab,
            busy,
            cancel_requested: false,
        }
    }

    #[test]
    fn idle_input_offers_run() {
        assert!(hint(&ctx(Tab::CodeInput, false)).contains("Ctrl+R: run"));
    }

    #[test]
    fn results_offer_export() {
        assert!(hint(&ctx(Tab::Results, false)).contains("Ctrl+S: export"));
    }

    #[test]
    fn busy_offers_cancel() {
        assert!(hint(&ctx(Tab::CodeInput, true)).contains("Ctrl+C: cancel"));
        let cancelling = ShortcutContext {
            cancel_requested: true,
            ..ctx(Tab::Results, true)
        };
        assert!(hint(&cancelling).starts_with("Cancelling"));
    }

    #[test]
    fn logs_screen_hint() {
        let logs = ShortcutContext {
            screen: Screen::DebugTraces,
            ..ctx(Tab::CodeInput, false)
        };
        assert!(hint(&logs).contains("Esc"));
    }
}
