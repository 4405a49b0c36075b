//! Styled rendering of the step-by-step narration.
//!
//! Models answer in light markdown: `Step N:` lines, numbered and bulleted
//! lists, `#` headings, fenced code and inline **bold** / `code`. Anything
//! else is a wrapped paragraph.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::layouts::{text_muted_style, text_style};
use crate::theme::DryrunPalette;
use crate::utils::{wrap_lines, LEFT_PADDING};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    /// `Step 3: x becomes 4` → label `Step 3`, text `x becomes 4`.
    Step { label: String, text: String },
    Numbered { marker: String, text: String },
    Bullet(String),
    Code { lang: Option<String>, code: String },
    Rule,
    Paragraph(String),
}

fn step_prefix(line: &str) -> Option<(String, String)> {
    let rest = line
        .strip_prefix("**")
        .unwrap_or(line)
        .strip_prefix("Step ")
        .or_else(|| line.strip_prefix("STEP "))?;
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let after = rest[digits..].trim_start_matches("**");
    let after = after.strip_prefix(':').or_else(|| after.strip_prefix('.'))?;
    let after = after.trim_start_matches("**");
    Some((format!("Step {}", &rest[..digits]), after.trim().to_string()))
}

fn numbered_prefix(line: &str) -> Option<(String, String)> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    let text = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") "))?;
    Some((format!("{}.", &line[..digits]), text.trim().to_string()))
}

fn bullet_text(line: &str) -> Option<&str> {
    ["- ", "* ", "• "]
        .iter()
        .find_map(|p| line.strip_prefix(p))
        .map(str::trim)
}

pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut lines = text.lines();

    fn flush(paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>) {
        let joined = paragraph.join(" ");
        let joined = joined.trim();
        if !joined.is_empty() {
            blocks.push(Block::Paragraph(joined.to_string()));
        }
        paragraph.clear();
    }

    while let Some(line) = lines.next() {
        let trimmed = line.trim();

        if let Some(lang) = trimmed.strip_prefix("```") {
            flush(&mut paragraph, &mut blocks);
            let lang = lang.trim();
            let mut code = Vec::new();
            for inner in lines.by_ref() {
                if inner.trim_start().starts_with("```") {
                    break;
                }
                code.push(inner);
            }
            blocks.push(Block::Code {
                lang: (!lang.is_empty()).then(|| lang.to_string()),
                code: code.join("\n"),
            });
            continue;
        }

        if trimmed.is_empty() {
            flush(&mut paragraph, &mut blocks);
            continue;
        }

        let block = if matches!(trimmed, "---" | "***" | "___") {
            Some(Block::Rule)
        } else if trimmed.starts_with('#') {
            let heading = trimmed.trim_start_matches('#').trim();
            (!heading.is_empty()).then(|| Block::Heading(heading.to_string()))
        } else if let Some((label, text)) = step_prefix(trimmed) {
            Some(Block::Step { label, text })
        } else if let Some((marker, text)) = numbered_prefix(trimmed) {
            Some(Block::Numbered { marker, text })
        } else {
            bullet_text(trimmed).map(|t| Block::Bullet(t.to_string()))
        };

        match block {
            Some(block) => {
                flush(&mut paragraph, &mut blocks);
                blocks.push(block);
            }
            None => paragraph.push(trimmed),
        }
    }
    flush(&mut paragraph, &mut blocks);
    blocks
}

/// Inline `**bold**` and `` `code` ``. Unclosed markers are kept as text.
pub fn inline_spans(text: &str, base: Style, palette: &DryrunPalette) -> Vec<Span<'static>> {
    let bold = base.add_modifier(Modifier::BOLD);
    let code = Style::default()
        .fg(palette.code_string.color())
        .bg(palette.editor_background.color());

    let mut spans = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let next_code = rest.find('`');
        let next_bold = rest.find("**");
        let (start, marker, style) = match (next_code, next_bold) {
            (Some(c), Some(b)) if b < c => (b, "**", bold),
            (Some(c), _) => (c, "`", code),
            (None, Some(b)) => (b, "**", bold),
            (None, None) => break,
        };
        let body_start = start + marker.len();
        let Some(len) = rest[body_start..].find(marker) else {
            break;
        };
        if start > 0 {
            spans.push(Span::styled(rest[..start].to_string(), base));
        }
        spans.push(Span::styled(
            rest[body_start..body_start + len].to_string(),
            style,
        ));
        rest = &rest[body_start + len + marker.len()..];
    }
    if !rest.is_empty() {
        spans.push(Span::styled(rest.to_string(), base));
    }
    spans
}

const KEYWORDS: &[&str] = &[
    "and", "as", "async", "await", "break", "case", "catch", "class", "const", "continue", "def",
    "do", "elif", "else", "enum", "except", "false", "False", "fn", "for", "from", "func",
    "function", "if", "impl", "import", "in", "let", "match", "mut", "new", "nil", "None", "not",
    "null", "or", "pass", "pub", "return", "self", "static", "struct", "switch", "this", "throw",
    "true", "True", "try", "var", "void", "while", "with", "yield",
];

/// Lightweight highlighting for one line of source in any C-like or Python-like language.
pub fn highlight_code(line: &str, palette: &DryrunPalette) -> Vec<Span<'static>> {
    let normal = text_style(palette.editor_foreground);
    let keyword = text_style(palette.code_keyword);
    let string = text_style(palette.code_string);
    let number = text_style(palette.code_number);
    let comment = text_muted_style(palette.code_comment);

    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut chars = line.char_indices().peekable();

    let flush_plain = |plain: &mut String, spans: &mut Vec<Span<'static>>| {
        if !plain.is_empty() {
            spans.push(Span::styled(std::mem::take(plain), normal));
        }
    };

    while let Some((i, c)) = chars.next() {
        let starts_comment = line[i..].starts_with("//")
            || (c == '#' && line[..i].chars().last().is_none_or(char::is_whitespace));
        if starts_comment {
            flush_plain(&mut plain, &mut spans);
            spans.push(Span::styled(line[i..].to_string(), comment));
            return spans;
        }
        if c == '"' || c == '\'' {
            flush_plain(&mut plain, &mut spans);
            let mut end = line.len();
            let mut escaped = false;
            for (j, d) in chars.by_ref() {
                if escaped {
                    escaped = false;
                } else if d == '\\' {
                    escaped = true;
                } else if d == c {
                    end = j + d.len_utf8();
                    break;
                }
            }
            spans.push(Span::styled(line[i..end].to_string(), string));
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            let mut end = i + c.len_utf8();
            while let Some(&(j, d)) = chars.peek() {
                if !(d.is_alphanumeric() || d == '_' || (c.is_ascii_digit() && d == '.')) {
                    break;
                }
                end = j + d.len_utf8();
                chars.next();
            }
            let word = &line[i..end];
            let style = if c.is_ascii_digit() {
                Some(number)
            } else if KEYWORDS.contains(&word) {
                Some(keyword)
            } else {
                None
            };
            match style {
                Some(style) => {
                    flush_plain(&mut plain, &mut spans);
                    spans.push(Span::styled(word.to_string(), style));
                }
                None => plain.push_str(word),
            }
            continue;
        }
        plain.push(c);
    }
    flush_plain(&mut plain, &mut spans);
    spans
}

fn wrapped_item(
    lines: &mut Vec<Line<'static>>,
    marker: Span<'static>,
    text: &str,
    width: usize,
    base: Style,
    palette: &DryrunPalette,
) {
    let marker_w = marker.width();
    let hang = " ".repeat(marker_w);
    for (i, seg) in wrap_lines(text, width.saturating_sub(marker_w).max(1))
        .iter()
        .enumerate()
    {
        let mut spans = vec![Span::raw(LEFT_PADDING)];
        if i == 0 {
            spans.push(marker.clone());
        } else {
            spans.push(Span::raw(hang.clone()));
        }
        spans.extend(inline_spans(seg, base, palette));
        lines.push(Line::from(spans));
    }
}

/// Renders narration text to display lines wrapped to `width` columns.
pub fn narrative_lines(text: &str, palette: &DryrunPalette, width: usize) -> Vec<Line<'static>> {
    let width = width.saturating_sub(LEFT_PADDING.len()).max(1);
    let normal = text_style(palette.text);
    let mut lines: Vec<Line<'static>> = Vec::new();

    for block in parse_blocks(text) {
        match block {
            Block::Heading(h) => {
                if !lines.is_empty() {
                    lines.push(Line::default());
                }
                lines.push(Line::from(vec![
                    Span::raw(LEFT_PADDING),
                    Span::styled(h, text_style(palette.accent).add_modifier(Modifier::BOLD)),
                ]));
            }
            Block::Step { label, text } => {
                let marker = Span::styled(
                    format!("{label}  "),
                    text_style(palette.accent).add_modifier(Modifier::BOLD),
                );
                wrapped_item(&mut lines, marker, &text, width, normal, palette);
            }
            Block::Numbered { marker, text } => {
                let marker = Span::styled(format!("{marker} "), text_muted_style(palette.text_muted));
                wrapped_item(&mut lines, marker, &text, width, normal, palette);
            }
            Block::Bullet(text) => {
                let marker = Span::styled("• ", text_muted_style(palette.text_muted));
                wrapped_item(&mut lines, marker, &text, width, normal, palette);
            }
            Block::Code { code, .. } => {
                let rows: Vec<&str> = code.lines().collect();
                let num_w = rows.len().max(1).to_string().len();
                for (i, row) in rows.iter().enumerate() {
                    let mut spans = vec![
                        Span::raw(LEFT_PADDING),
                        Span::styled(
                            format!("{:>num_w$} │ ", i + 1),
                            text_muted_style(palette.editor_line_number),
                        ),
                    ];
                    spans.extend(highlight_code(row, palette));
                    lines.push(Line::from(spans));
                }
            }
            Block::Rule => {
                lines.push(Line::from(vec![
                    Span::raw(LEFT_PADDING),
                    Span::styled("─".repeat(width), text_muted_style(palette.border)),
                ]));
            }
            Block::Paragraph(p) => {
                for seg in wrap_lines(&p, width) {
                    let mut spans = vec![Span::raw(LEFT_PADDING)];
                    spans.extend(inline_spans(&seg, normal, palette));
                    lines.push(Line::from(spans));
                }
            }
        }
    }
    lines
}
