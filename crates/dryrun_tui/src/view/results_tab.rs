//! Analysis Results tab: narrated walkthrough on the left; summary chart and
//! counts (or the debug JSON, F3) on the right.

use dryrun_core::{AnalysisRecord, AnalysisResult, ChartSpec, SummaryField};
use dryrun_constant::theme::chart as chart_colors;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::animation::{busy_line, Spinner};
use crate::layouts::{block_for_panel, danger_style, side_by_side, text_muted_style, text_style, warning_style};
use crate::narrative::narrative_lines;
use crate::state::TuiState;
use crate::theme::{DryrunPalette, Rgb};
use crate::utils::{percent_split, truncate_ellipsis, LEFT_PADDING};

pub(super) fn draw(frame: &mut Frame, state: &mut TuiState, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    if state.latest.is_none() && !state.is_busy {
        draw_empty(frame, state, area);
        return;
    }
    let (left, right) = side_by_side(area, 58);
    draw_narrative(frame, state, left);
    draw_summary(frame, state, right);
}

fn draw_empty(frame: &mut Frame, state: &TuiState, area: Rect) {
    let palette = &state.palette;
    let mut lines = vec![
        Line::default(),
        Line::from(vec![
            Span::raw(LEFT_PADDING),
            Span::styled("No analysis yet.", text_style(palette.text).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::raw(LEFT_PADDING),
            Span::styled(
                "Fill in the code and the test case on the Code Input tab (F1), then press Ctrl+R.",
                text_muted_style(palette.text_muted),
            ),
        ]),
    ];
    if let Some(err) = &state.last_error {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::raw(LEFT_PADDING),
            Span::styled(format!("✗ {err}"), danger_style(palette.danger)),
        ]));
    }
    let block = block_for_panel("Analysis Results", palette, false);
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn meta_line(record: &AnalysisRecord) -> String {
    let mut parts = vec![record.response.provider.clone(), record.response.model.clone()];
    if let Some(usage) = &record.response.usage {
        parts.push(format!("{} tokens", usage.total_tokens));
    }
    parts.push(
        record
            .completed_at
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
            .to_string(),
    );
    format!(" {} ", parts.join(" · "))
}

fn draw_narrative(frame: &mut Frame, state: &mut TuiState, area: Rect) {
    let palette = &state.palette;
    let mut block = block_for_panel("Step-by-step Execution", palette, true);
    if !state.is_busy
        && let Some(record) = &state.latest
    {
        block = block.title_bottom(
            Line::from(Span::styled(meta_line(record), text_muted_style(palette.text_muted)))
                .right_aligned(),
        );
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let text = if state.is_busy && state.streaming_text.is_empty() {
        None
    } else {
        state.narrative()
    };
    let mut lines = text
        .map(|t| narrative_lines(t, palette, width))
        .unwrap_or_default();

    if state.is_busy {
        let spinner = state
            .busy_since
            .map(Spinner::started_at)
            .unwrap_or_default();
        let label = if lines.is_empty() {
            "Analyzing code…"
        } else {
            "Receiving…"
        };
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(busy_line(&spinner, label, palette));
    } else if let Some(err) = &state.last_error {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::raw(LEFT_PADDING),
            Span::styled(format!("✗ {err}"), danger_style(palette.danger)),
        ]));
    }

    let viewport = inner.height as usize;
    state.results_content_height = lines.len();
    state.results_viewport_height = viewport;
    let max_scroll = lines.len().saturating_sub(viewport);
    state.results_scroll = if state.is_busy {
        max_scroll
    } else {
        state.results_scroll.min(max_scroll)
    };

    let scroll = state.results_scroll.min(u16::MAX as usize) as u16;
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}

fn draw_summary(frame: &mut Frame, state: &TuiState, area: Rect) {
    let palette = &state.palette;
    let Some(record) = &state.latest else {
        let block = block_for_panel("Summary", palette, false);
        let waiting = Line::from(vec![
            Span::raw(LEFT_PADDING),
            Span::styled("Waiting for the first result…", text_muted_style(palette.text_muted)),
        ]);
        frame.render_widget(Paragraph::new(waiting).block(block), area);
        return;
    };

    let (chart_area, lower) = percent_split(area, 55, 8);
    match record.chart() {
        Some(spec) => draw_chart(frame, chart_area, &spec, palette),
        None => draw_chart_unavailable(frame, chart_area, &record.result, palette),
    }
    if state.show_debug_json {
        draw_debug(frame, lower, record, palette);
    } else {
        draw_counts(frame, lower, &record.result, palette);
    }
}

fn draw_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec, palette: &DryrunPalette) {
    let axis = Line::from(Span::styled(
        format!(" {} / {} ", spec.x_label, spec.y_label),
        text_muted_style(palette.text_muted),
    ))
    .right_aligned();
    let block = block_for_panel(&spec.title, palette, false).title_bottom(axis);
    let inner = block.inner(area);

    let n = spec.bars.len().max(1) as u16;
    let bar_width = (inner.width.saturating_sub(n - 1) / n).clamp(1, 12);
    let bars: Vec<Bar> = spec
        .bars
        .iter()
        .map(|b| {
            let color = Rgb::from(b.color).color();
            Bar::default()
                .value(b.value)
                .label(Line::from(truncate_ellipsis(b.field.label(), bar_width as usize)))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(palette.background.color()).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(spec.max_value().max(1));
    frame.render_widget(chart, area);
}

fn draw_chart_unavailable(frame: &mut Frame, area: Rect, result: &AnalysisResult, palette: &DryrunPalette) {
    let reason = result
        .extraction_error
        .as_ref()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no summary reported".to_string());
    let lines = vec![
        Line::from(vec![
            Span::raw(LEFT_PADDING),
            Span::styled("Summary chart unavailable", warning_style(palette.warning)),
        ]),
        Line::from(vec![
            Span::raw(LEFT_PADDING),
            Span::styled(reason, text_muted_style(palette.text_muted)),
        ]),
    ];
    let block = block_for_panel("Code Analysis Summary", palette, false);
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn draw_counts(frame: &mut Frame, area: Rect, result: &AnalysisResult, palette: &DryrunPalette) {
    let rows: Vec<Row> = SummaryField::ALL
        .iter()
        .zip(chart_colors::ALL)
        .map(|(field, color)| {
            let value = result
                .summary
                .as_ref()
                .and_then(|s| s.get(*field))
                .map(|v| v.to_string())
                .unwrap_or_else(|| "–".to_string());
            Row::new(vec![
                Cell::from(Span::styled("■", Style::default().fg(Rgb::from(color).color()))),
                Cell::from(Span::styled(field.label(), text_style(palette.text))),
                Cell::from(Line::from(Span::styled(
                    value,
                    text_style(palette.text).add_modifier(Modifier::BOLD),
                )).right_aligned()),
            ])
        })
        .collect();

    let mut block = block_for_panel("Summary", palette, false);
    if !result.warnings.is_empty() {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} warning(s) · F3 for details ", result.warnings.len()),
            warning_style(palette.warning),
        )));
    }
    let table = Table::new(
        rows,
        [Constraint::Length(2), Constraint::Fill(1), Constraint::Length(6)],
    )
    .block(block);
    frame.render_widget(table, area);
}

/// Pretty-printed summary block with extraction diagnostics.
fn debug_lines(record: &AnalysisRecord, palette: &DryrunPalette) -> Vec<Line<'static>> {
    let muted = text_muted_style(palette.text_muted);
    let normal = text_style(palette.code_string);
    let mut lines = Vec::new();

    match &record.result.summary_block {
        Some(block) => {
            let pretty = serde_json::from_str::<serde_json::Value>(block)
                .ok()
                .and_then(|v| serde_json::to_string_pretty(&v).ok())
                .unwrap_or_else(|| block.clone());
            lines.push(Line::from(Span::styled("summary_block:", muted)));
            lines.extend(pretty.lines().map(|l| Line::from(Span::styled(l.to_string(), normal))));
        }
        None => lines.push(Line::from(Span::styled("summary_block: none", muted))),
    }
    if let Some(err) = &record.result.extraction_error {
        lines.push(Line::from(Span::styled(
            format!("extraction_error: {err}"),
            danger_style(palette.danger),
        )));
    }
    for warning in &record.result.warnings {
        lines.push(Line::from(Span::styled(
            format!("warning: {warning}"),
            warning_style(palette.warning),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("raw response: {} bytes", record.raw_text().len()),
        muted,
    )));
    lines
}

fn draw_debug(frame: &mut Frame, area: Rect, record: &AnalysisRecord, palette: &DryrunPalette) {
    let block = block_for_panel("Debug JSON (F3)", palette, false);
    frame.render_widget(
        Paragraph::new(debug_lines(record, palette))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}
