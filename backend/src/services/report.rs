//! Summary, chart and export views of a coverage outcome.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::CoverageOutcome;
use crate::parsing::csv_parser::write_csv_string;

pub const CHART_TITLE: &str = "Traffic vs Revenue by Coverage";
pub const CHART_X_LABEL: &str = "Coverage Groups";
pub const CHART_Y_LABEL: &str = "Percentage";
pub const TRAFFIC_SERIES: &str = "Traffic (%)";
pub const REVENUE_SERIES: &str = "Revenue (%)";

/// Header of the combined export, in column order.
pub const EXPORT_COLUMNS: [&str; 6] = [
    "url",
    "traffic",
    "revenue",
    "cumulative_traffic",
    "cumulative_revenue",
    "Sheet",
];

/// One line of the overview table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "Coverage")]
    pub coverage: String,
    #[serde(rename = "Nr. Pages")]
    pub pages: usize,
    #[serde(rename = "Exact Revenue")]
    pub exact_revenue: String,
    #[serde(rename = "Exact Traffic")]
    pub exact_traffic: String,
}

/// A named numeric series of the coverage chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Line chart payload: a traffic and a revenue series over the coverage
/// labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub traffic: ChartSeries,
    pub revenue: ChartSeries,
}

/// One record of one group in the combined export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub url: String,
    pub traffic: f64,
    pub revenue: f64,
    pub cumulative_traffic: f64,
    pub cumulative_revenue: f64,
    #[serde(rename = "Sheet")]
    pub sheet: String,
}

fn format_pct(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Inverse of the summary percentage format. Unparseable cells read as 0.
fn parse_pct(value: &str) -> f64 {
    value.trim().trim_end_matches('%').parse().unwrap_or(0.0)
}

/// Overview rows, one per threshold in threshold order.
pub fn build_summary(outcome: &CoverageOutcome) -> Vec<SummaryRow> {
    outcome
        .groups
        .iter()
        .map(|group| SummaryRow {
            coverage: group.label(),
            pages: group.prefix_length,
            exact_revenue: format_pct(group.achieved_revenue_pct),
            exact_traffic: format_pct(group.achieved_traffic_pct),
        })
        .collect()
}

/// Chart payload built from the summary, so both lines plot exactly the
/// rounded figures of the table.
pub fn build_chart(summary: &[SummaryRow]) -> ChartData {
    ChartData {
        title: CHART_TITLE.to_string(),
        x_label: CHART_X_LABEL.to_string(),
        y_label: CHART_Y_LABEL.to_string(),
        categories: summary.iter().map(|row| row.coverage.clone()).collect(),
        traffic: ChartSeries {
            name: TRAFFIC_SERIES.to_string(),
            values: summary.iter().map(|row| parse_pct(&row.exact_traffic)).collect(),
        },
        revenue: ChartSeries {
            name: REVENUE_SERIES.to_string(),
            values: summary.iter().map(|row| parse_pct(&row.exact_revenue)).collect(),
        },
    }
}

/// Concatenation of every group's members, smallest threshold first.
pub fn build_export_rows(outcome: &CoverageOutcome) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    for group in &outcome.groups {
        let sheet = group.sheet_tag();
        rows.extend(outcome.members(group).iter().map(|ranked| ExportRow {
            url: ranked.record.id.clone(),
            traffic: ranked.record.traffic,
            revenue: ranked.record.revenue,
            cumulative_traffic: ranked.cumulative_traffic_pct,
            cumulative_revenue: ranked.cumulative_revenue_pct,
            sheet: sheet.clone(),
        }));
    }
    rows
}

/// Combined export as CSV text.
pub fn export_csv(rows: &[ExportRow]) -> PolarsResult<String> {
    let mut df = df!(
        EXPORT_COLUMNS[0] => rows.iter().map(|r| r.url.as_str()).collect::<Vec<_>>(),
        EXPORT_COLUMNS[1] => rows.iter().map(|r| r.traffic).collect::<Vec<_>>(),
        EXPORT_COLUMNS[2] => rows.iter().map(|r| r.revenue).collect::<Vec<_>>(),
        EXPORT_COLUMNS[3] => rows.iter().map(|r| r.cumulative_traffic).collect::<Vec<_>>(),
        EXPORT_COLUMNS[4] => rows.iter().map(|r| r.cumulative_revenue).collect::<Vec<_>>(),
        EXPORT_COLUMNS[5] => rows.iter().map(|r| r.sheet.as_str()).collect::<Vec<_>>()
    )?;
    write_csv_string(&mut df)
}

fn pad_row(values: &[&str], widths: &[usize]) -> String {
    values
        .iter()
        .zip(widths)
        .map(|(value, width)| format!("{:<width$}", value, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Fixed-width text rendering of the overview table.
pub fn render_summary_table(summary: &[SummaryRow]) -> String {
    let headers = ["Coverage", "Nr. Pages", "Exact Revenue", "Exact Traffic"];
    let cells: Vec<[String; 4]> = summary
        .iter()
        .map(|row| {
            [
                row.coverage.clone(),
                row.pages.to_string(),
                row.exact_revenue.clone(),
                row.exact_traffic.clone(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut lines = vec![
        pad_row(&headers, &widths),
        pad_row(&rule.iter().map(String::as_str).collect::<Vec<_>>(), &widths),
    ];
    for row in &cells {
        lines.push(pad_row(&row.iter().map(String::as_str).collect::<Vec<_>>(), &widths));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
