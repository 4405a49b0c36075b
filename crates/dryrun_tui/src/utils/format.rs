//! Formatting helpers for TUI text (durations, truncation, wrapping).

use std::time::Duration;

use unicode_width::UnicodeWidthStr;

/// Format a duration for display: "850ms", "4.2s", "2m 05s".
pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let secs = d.as_secs();
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

/// Truncate to at most `max_width` display columns, ending with "…" when cut.
pub fn truncate_ellipsis(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Word-wrap one paragraph to lines of at most `width` display columns.
/// Words longer than `width` are hard-split. Leading indentation of the
/// paragraph is kept on the first line.
pub fn wrap_lines(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let indent: String = s.chars().take_while(|c| *c == ' ').collect();
    let mut out = Vec::new();
    let mut line = indent.clone();
    let mut line_w = indent.width();
    let mut has_word = false;

    for word in s.split_whitespace() {
        let mut word = word.to_string();
        loop {
            let word_w = word.width();
            let gap = usize::from(has_word);
            if line_w + gap + word_w <= width {
                if has_word {
                    line.push(' ');
                }
                line.push_str(&word);
                line_w += gap + word_w;
                has_word = true;
                break;
            }
            if has_word {
                out.push(std::mem::take(&mut line));
                line_w = 0;
                has_word = false;
                continue;
            }
            // Word alone does not fit: hard split at the width boundary.
            let room = width.saturating_sub(line_w).max(1);
            let head = take_width(&word, room);
            let rest = word[head.len()..].to_string();
            line.push_str(&head);
            out.push(std::mem::take(&mut line));
            line_w = 0;
            if rest.is_empty() {
                break;
            }
            word = rest;
        }
    }
    if has_word {
        out.push(line);
    }
    out
}

fn take_width(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width && !out.is_empty() {
            break;
        }
        out.push(c);
        used += w;
    }
    out
}
