//! Braille spinner driven by wall-clock time, so its speed does not depend on
//! how often the loop redraws.

use std::time::{Duration, Instant};

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme::DryrunPalette;
use crate::utils::{format_duration, LEFT_PADDING};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Time each frame stays on screen.
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

#[derive(Debug, Clone)]
pub struct Spinner {
    started: Instant,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn started_at(started: Instant) -> Self {
        Self { started }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Frame for the given elapsed time.
    pub fn frame_at(elapsed: Duration) -> &'static str {
        let idx = (elapsed.as_millis() / FRAME_INTERVAL.as_millis()) as usize % FRAMES.len();
        FRAMES[idx]
    }

    pub fn frame(&self) -> &'static str {
        Self::frame_at(self.elapsed())
    }
}

/// `  ⠋ Analyzing code… 4.2s`, elapsed time muted.
pub fn busy_line(spinner: &Spinner, label: &str, palette: &DryrunPalette) -> Line<'static> {
    Line::from(vec![
        Span::raw(LEFT_PADDING),
        Span::styled(
            spinner.frame().to_string(),
            Style::default().fg(palette.accent.color()),
        ),
        Span::raw(" "),
        Span::styled(
            label.to_string(),
            Style::default()
                .fg(palette.text.color())
                .add_modifier(Modifier::ITALIC),
        ),
        Span::raw(" "),
        Span::styled(
            format_duration(spinner.elapsed()),
            Style::default().fg(palette.text_muted.color()),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_advance_with_time() {
        assert_eq!(Spinner::frame_at(Duration::ZERO), "⠋");
        assert_eq!(Spinner::frame_at(Duration::from_millis(80)), "⠙");
        assert_eq!(Spinner::frame_at(Duration::from_millis(79)), "⠋");
    }

    #[test]
    fn frames_wrap_around() {
        let full_cycle = FRAME_INTERVAL * FRAMES.len() as u32;
        assert_eq!(Spinner::frame_at(full_cycle), FRAMES[0]);
    }

    #[test]
    fn busy_line_has_label() {
        let palette = DryrunPalette::dark();
        let line = busy_line(&Spinner::new(), "Analyzing code…", &palette);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("Analyzing code…"));
    }
}
