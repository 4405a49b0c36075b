//! Text rendering of an analysis result: narrative, counts table, bar chart.

use comfy_table::{Cell, Color};
use console::style;
use dryrun_core::{AnalysisResult, ChartSpec, SummaryChartBuilder, SummaryCounts, SummaryField};

use crate::output;

/// Widest bar in the terminal chart, in cells.
const CHART_WIDTH: usize = 40;

pub fn print_result(result: &AnalysisResult) {
    output::header("Step-by-step Execution");
    println!("{}", result.narrative.trim());
    println!();

    match &result.summary {
        Some(summary) => {
            print_summary_table(summary);
            println!();
            print_chart(&SummaryChartBuilder::new().build(summary));
        }
        None => {
            let reason = result
                .extraction_error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no summary block".to_string());
            output::warning(&format!("Summary unavailable: {reason}"));
        }
    }
    for warning in &result.warnings {
        output::warning(warning);
    }
}

fn print_summary_table(summary: &SummaryCounts) {
    let mut table = output::table();
    output::table_header(&mut table, &["Metric", "Count", "Meaning"]);
    for field in SummaryField::ALL {
        let count = match summary.get(field) {
            Some(n) => Cell::new(n).fg(Color::Green),
            None => Cell::new("–").fg(Color::DarkGrey),
        };
        table.add_row(vec![Cell::new(field.label()), count, Cell::new(field.description())]);
    }
    println!("{table}");
}

fn print_chart(spec: &ChartSpec) {
    output::header(&spec.title);
    let bars = ascii_bars(spec, CHART_WIDTH);
    let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
    for bar in &bars {
        let cells = style("█".repeat(bar.cells)).color256(ansi256(bar.color));
        println!("  {:<label_width$} │{} {}", bar.label, cells, bar.value);
    }
    output::dim(&format!("  {} per {}", spec.y_label, spec.x_label.to_lowercase()));
}

#[derive(Debug, PartialEq, Eq)]
pub struct AsciiBar<'a> {
    pub label: &'a str,
    pub cells: usize,
    pub value: u64,
    pub color: (u8, u8, u8),
}

/// Bars scaled so the largest value fills `max_cells`. Non-zero values get at least one cell.
pub fn ascii_bars(spec: &ChartSpec, max_cells: usize) -> Vec<AsciiBar<'_>> {
    let max = spec.max_value();
    spec.bars
        .iter()
        .map(|bar| {
            let cells = if max == 0 || bar.value == 0 {
                0
            } else {
                let scaled = (bar.value as f64 / max as f64 * max_cells as f64).round() as usize;
                scaled.max(1)
            };
            AsciiBar {
                label: &bar.label,
                cells,
                value: bar.value,
                color: bar.color,
            }
        })
        .collect()
}

/// Nearest xterm-256 color cube index.
pub fn ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    let level = |c: u8| ((c as u16 * 5 + 127) / 255) as u8;
    16 + 36 * level(r) + 6 * level(g) + level(b)
}
