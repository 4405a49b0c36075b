//! Multi-line text buffer with a cursor, used for the code and test-case inputs.
//!
//! Cursor columns are byte offsets that always sit on a char boundary.

use crate::utils::{scroll_window, TAB_WIDTH};

#[derive(Debug, Clone)]
pub struct TextEditor {
    lines: Vec<String>,
    row: usize,
    col: usize,
    /// First visible line.
    pub scroll: usize,
}

impl Default for TextEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEditor {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            scroll: 0,
        }
    }

    /// Editor holding `text` with the cursor at the end.
    pub fn with_text(text: &str) -> Self {
        let mut editor = Self::new();
        editor.insert_str(text);
        editor
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    /// (row, byte column).
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Display column of the cursor, counting chars before it.
    pub fn cursor_display_col(&self) -> usize {
        self.current()[..self.col].chars().count()
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn current(&self) -> &str {
        &self.lines[self.row]
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.newline();
            return;
        }
        let col = self.col;
        self.lines[self.row].insert(col, c);
        self.col += c.len_utf8();
    }

    /// Inserts pasted text. `\r\n` and `\r` become newlines; tabs expand to spaces.
    pub fn insert_str(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        for c in normalized.chars() {
            match c {
                '\t' => self.insert_tab(),
                c => self.insert_char(c),
            }
        }
    }

    pub fn insert_tab(&mut self) {
        for _ in 0..TAB_WIDTH {
            self.insert_char(' ');
        }
    }

    /// Splits the current line at the cursor.
    pub fn newline(&mut self) {
        let col = self.col;
        let rest = self.lines[self.row].split_off(col);
        self.row += 1;
        self.lines.insert(self.row, rest);
        self.col = 0;
    }

    /// Deletes the char before the cursor, joining with the previous line at column 0.
    pub fn backspace(&mut self) {
        if self.col > 0 {
            let prev = prev_boundary(self.current(), self.col);
            let col = self.col;
            self.lines[self.row].replace_range(prev..col, "");
            self.col = prev;
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.lines[self.row].len();
            self.lines[self.row].push_str(&line);
        }
    }

    /// Deletes the char under the cursor, joining with the next line at line end.
    pub fn delete(&mut self) {
        if self.col < self.current().len() {
            let next = next_boundary(self.current(), self.col);
            let col = self.col;
            self.lines[self.row].replace_range(col..next, "");
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    /// Clears the current line.
    pub fn clear_line(&mut self) {
        self.lines[self.row].clear();
        self.col = 0;
    }

    pub fn left(&mut self) {
        if self.col > 0 {
            self.col = prev_boundary(self.current(), self.col);
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.current().len();
        }
    }

    pub fn right(&mut self) {
        if self.col < self.current().len() {
            self.col = next_boundary(self.current(), self.col);
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn up(&mut self) {
        if self.row > 0 {
            let chars = self.cursor_display_col();
            self.row -= 1;
            self.col = byte_at_char(self.current(), chars);
        }
    }

    pub fn down(&mut self) {
        if self.row + 1 < self.lines.len() {
            let chars = self.cursor_display_col();
            self.row += 1;
            self.col = byte_at_char(self.current(), chars);
        }
    }

    pub fn home(&mut self) {
        self.col = 0;
    }

    pub fn end(&mut self) {
        self.col = self.current().len();
    }

    /// Adjusts `scroll` so the cursor row is visible in a `viewport`-line window.
    pub fn ensure_visible(&mut self, viewport: usize) {
        self.scroll = scroll_window(self.scroll, self.row, viewport);
    }
}

fn prev_boundary(s: &str, col: usize) -> usize {
    s[..col].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
}

fn next_boundary(s: &str, col: usize) -> usize {
    s[col..]
        .chars()
        .next()
        .map(|c| col + c.len_utf8())
        .unwrap_or(col)
}

fn byte_at_char(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_newlines() {
        let mut ed = TextEditor::new();
        for c in "def f():".chars() {
            ed.insert_char(c);
        }
        ed.newline();
        ed.insert_str("    return 1");
        assert_eq!(ed.text(), "def f():\n    return 1");
        assert_eq!(ed.cursor(), (1, 12));
    }

    #[test]
    fn paste_normalizes_line_endings_and_tabs() {
        let ed = TextEditor::with_text("a\r\n\tb\rc");
        assert_eq!(ed.lines(), &["a", "    b", "c"]);
    }

    #[test]
    fn backspace_joins_lines() {
        let mut ed = TextEditor::with_text("ab\ncd");
        ed.home();
        ed.backspace();
        assert_eq!(ed.text(), "abcd");
        assert_eq!(ed.cursor(), (0, 2));
    }

    #[test]
    fn delete_joins_next_line() {
        let mut ed = TextEditor::with_text("ab\ncd");
        ed.up();
        ed.end();
        ed.delete();
        assert_eq!(ed.text(), "abcd");
    }

    #[test]
    fn multibyte_cursor_movement() {
        let mut ed = TextEditor::with_text("héllo");
        ed.home();
        ed.right();
        ed.right();
        assert_eq!(ed.cursor(), (0, 3));
        ed.backspace();
        assert_eq!(ed.text(), "hllo");
        ed.left();
        ed.delete();
        assert_eq!(ed.text(), "llo");
    }

    #[test]
    fn vertical_moves_keep_column_within_line() {
        let mut ed = TextEditor::with_text("long line\nab");
        ed.up();
        assert_eq!(ed.cursor(), (0, 2));
        ed.end();
        ed.down();
        assert_eq!(ed.cursor(), (1, 2));
    }

    #[test]
    fn left_wraps_to_previous_line() {
        let mut ed = TextEditor::with_text("ab\nc");
        ed.home();
        ed.left();
        assert_eq!(ed.cursor(), (0, 2));
        ed.right();
        assert_eq!(ed.cursor(), (1, 0));
    }

    #[test]
    fn blank_detection() {
        assert!(TextEditor::with_text("  \n\t").is_blank());
        assert!(!TextEditor::with_text(" x ").is_blank());
    }

    #[test]
    fn ensure_visible_follows_cursor() {
        let mut ed = TextEditor::with_text("1\n2\n3\n4\n5\n6");
        ed.ensure_visible(3);
        assert_eq!(ed.scroll, 3);
        for _ in 0..5 {
            ed.up();
        }
        ed.ensure_visible(3);
        assert_eq!(ed.scroll, 0);
    }
}
