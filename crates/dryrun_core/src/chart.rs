use dryrun_constant::theme::chart as colors;
use serde::{Deserialize, Serialize};

use crate::summary::{SummaryCounts, SummaryField};

pub const CHART_TITLE: &str = "Code Analysis Summary";
pub const X_AXIS_LABEL: &str = "Metrics";
pub const Y_AXIS_LABEL: &str = "Count";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartBar {
    pub field: SummaryField,
    pub label: String,
    pub value: u64,
    pub color: (u8, u8, u8),
}

impl ChartBar {
    pub fn color_hex(&self) -> String {
        let (r, g, b) = self.color;
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

/// Renderer-agnostic bar chart description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<ChartBar>,
}

impl ChartSpec {
    pub fn max_value(&self) -> u64 {
        self.bars.iter().map(|b| b.value).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryChartBuilder;

impl SummaryChartBuilder {
    pub fn new() -> Self {
        Self
    }

    /// One bar per metric in fixed order; unreported metrics plot as 0.
    pub fn build(&self, summary: &SummaryCounts) -> ChartSpec {
        let bars = SummaryField::ALL
            .iter()
            .zip(colors::ALL)
            .map(|(field, color)| ChartBar {
                field: *field,
                label: field.key().to_string(),
                value: summary.get(*field).unwrap_or(0),
                color,
            })
            .collect();

        ChartSpec {
            title: CHART_TITLE.to_string(),
            x_label: X_AXIS_LABEL.to_string(),
            y_label: Y_AXIS_LABEL.to_string(),
            bars,
        }
    }
}
