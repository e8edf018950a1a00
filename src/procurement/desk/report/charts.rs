//! Self-contained SVG charts for the dashboards.

use std::f64::consts::PI;
use std::fmt::Write as _;

use crate::procurement::desk::audit::TestStatus;
use crate::procurement::desk::audit::master::MasterAuditReport;
use crate::procurement::desk::model::DOCUMENT_COUNT;
use crate::procurement::desk::report::{InventoryStats, escape_html};

pub const GREEN: &str = "#2ecc71";
pub const RED: &str = "#e74c3c";
pub const ORANGE: &str = "#f39c12";
pub const BLUE: &str = "#3498db";

const PANEL_WIDTH: f64 = 480.0;
const PANEL_HEIGHT: f64 = 360.0;

/// One slice or bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

impl Segment {
    pub fn new(label: impl Into<String>, value: f64, color: &'static str) -> Self {
        Self {
            label: label.into(),
            value,
            color,
        }
    }
}

/// Colour for a 0-100 score: red below 70, orange below 85, green otherwise.
pub fn score_color(score: f64) -> &'static str {
    if score < 70.0 {
        RED
    } else if score < 85.0 {
        ORANGE
    } else {
        GREEN
    }
}

/// Pie chart panel whose top-left corner sits at (`x`, `y`).
pub fn pie_chart(x: f64, y: f64, title: &str, segments: &[Segment]) -> String {
    let mut out = String::new();
    let cx = x + PANEL_WIDTH / 2.0;
    let cy = y + PANEL_HEIGHT / 2.0;
    let radius = 120.0;
    let _ = writeln!(
        out,
        r#"<text x="{cx:.1}" y="{:.1}" text-anchor="middle" font-size="18" font-weight="bold">{}</text>"#,
        y + 28.0,
        escape_html(title)
    );

    let total: f64 = segments.iter().map(|segment| segment.value.max(0.0)).sum();
    if total <= 0.0 {
        let _ = writeln!(
            out,
            r##"<circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="#ecf0f1"/>"##
        );
        return out;
    }

    let mut angle = -PI / 2.0;
    for segment in segments.iter().filter(|segment| segment.value > 0.0) {
        let share = segment.value / total;
        let sweep = share * 2.0 * PI;
        if share >= 0.9999 {
            let _ = writeln!(
                out,
                r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="{}"/>"#,
                segment.color
            );
        } else {
            let (x1, y1) = (cx + radius * angle.cos(), cy + radius * angle.sin());
            let end = angle + sweep;
            let (x2, y2) = (cx + radius * end.cos(), cy + radius * end.sin());
            let large_arc = u8::from(sweep > PI);
            let _ = writeln!(
                out,
                r#"<path d="M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {radius:.2} {radius:.2} 0 {large_arc} 1 {x2:.2} {y2:.2} Z" fill="{}" stroke="white" stroke-width="2"/>"#,
                segment.color
            );
        }
        let middle = angle + sweep / 2.0;
        let (lx, ly) = (
            cx + radius * 0.6 * middle.cos(),
            cy + radius * 0.6 * middle.sin(),
        );
        let _ = writeln!(
            out,
            r#"<text x="{lx:.1}" y="{ly:.1}" text-anchor="middle" font-size="13" fill="white">{:.1}%</text>"#,
            share * 100.0
        );
        angle += sweep;
    }

    let mut legend_y = y + PANEL_HEIGHT - 24.0 * segments.len() as f64;
    for segment in segments {
        let _ = writeln!(
            out,
            r#"<rect x="{:.1}" y="{:.1}" width="14" height="14" fill="{}"/><text x="{:.1}" y="{:.1}" font-size="13">{} ({})</text>"#,
            x + 16.0,
            legend_y,
            segment.color,
            x + 36.0,
            legend_y + 12.0,
            escape_html(&segment.label),
            segment.value
        );
        legend_y += 22.0;
    }
    out
}

/// Vertical bar chart panel scaled to `max_value`.
pub fn bar_chart(x: f64, y: f64, title: &str, segments: &[Segment], max_value: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="18" font-weight="bold">{}</text>"#,
        x + PANEL_WIDTH / 2.0,
        y + 28.0,
        escape_html(title)
    );

    let plot_left = x + 40.0;
    let plot_bottom = y + PANEL_HEIGHT - 40.0;
    let plot_height = PANEL_HEIGHT - 100.0;
    let plot_width = PANEL_WIDTH - 60.0;
    let _ = writeln!(
        out,
        r##"<line x1="{plot_left:.1}" y1="{plot_bottom:.1}" x2="{:.1}" y2="{plot_bottom:.1}" stroke="#7f8c8d"/>"##,
        plot_left + plot_width
    );
    if segments.is_empty() {
        return out;
    }

    let scale = if max_value > 0.0 { max_value } else { 1.0 };
    let slot = plot_width / segments.len() as f64;
    let bar_width = slot * 0.6;
    for (index, segment) in segments.iter().enumerate() {
        let height = (segment.value.max(0.0) / scale).min(1.0) * plot_height;
        let bar_x = plot_left + slot * index as f64 + (slot - bar_width) / 2.0;
        let bar_y = plot_bottom - height;
        let center = bar_x + bar_width / 2.0;
        let _ = writeln!(
            out,
            r#"<rect x="{bar_x:.1}" y="{bar_y:.1}" width="{bar_width:.1}" height="{height:.1}" fill="{}" opacity="0.8"/>"#,
            segment.color
        );
        let _ = writeln!(
            out,
            r#"<text x="{center:.1}" y="{:.1}" text-anchor="middle" font-size="12" font-weight="bold">{}</text>"#,
            bar_y - 4.0,
            format_value(segment.value)
        );
        let _ = writeln!(
            out,
            r#"<text x="{center:.1}" y="{:.1}" text-anchor="middle" font-size="11">{}</text>"#,
            plot_bottom + 16.0,
            escape_html(&segment.label)
        );
    }
    out
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn document(width: f64, height: f64, title: &str, body: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\" font-family=\"Arial, sans-serif\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n\
         <text x=\"{:.1}\" y=\"36\" text-anchor=\"middle\" font-size=\"24\" font-weight=\"bold\">{}</text>\n\
         {body}</svg>\n",
        width / 2.0,
        escape_html(title)
    )
}

/// Compliance split and score distribution.
pub fn inventory_chart_svg(stats: &InventoryStats) -> String {
    let split = [
        Segment::new("Ready for R&D", stats.ready_for_rd as f64, GREEN),
        Segment::new("Missing Docs", stats.needing_documents() as f64, RED),
    ];
    let mut histogram = vec![0usize; DOCUMENT_COUNT + 1];
    for score in &stats.compliance_scores {
        if let Some(bucket) = histogram.get_mut(*score) {
            *bucket += 1;
        }
    }
    let max_bucket = histogram.iter().copied().max().unwrap_or(0) as f64;
    let bars: Vec<Segment> = histogram
        .iter()
        .enumerate()
        .map(|(score, count)| Segment::new(score.to_string(), *count as f64, BLUE))
        .collect();

    let mut body = pie_chart(
        0.0,
        50.0,
        &format!(
            "Compliance Status ({}/{} Ready)",
            stats.ready_for_rd, stats.total_materials
        ),
        &split,
    );
    body.push_str(&bar_chart(
        PANEL_WIDTH,
        50.0,
        &format!(
            "Compliance Scores (avg {:.1}/{DOCUMENT_COUNT})",
            stats.average_compliance
        ),
        &bars,
        max_bucket,
    ));
    document(
        PANEL_WIDTH * 2.0,
        PANEL_HEIGHT + 60.0,
        "Agentic Procurement System Dashboard",
        &body,
    )
}

/// Component scores, stock levels and stress results of an audit.
pub fn audit_chart_svg(report: &MasterAuditReport) -> String {
    let components: Vec<Segment> = report
        .component_scores
        .labelled()
        .into_iter()
        .map(|(label, score)| Segment::new(label, score, score_color(score)))
        .collect();

    let stock = &report.detailed_reports.resilience.stock_analysis;
    let stock_levels = [
        Segment::new(
            "Normal Stock",
            stock.total_items.saturating_sub(stock.low_stock_count) as f64,
            GREEN,
        ),
        Segment::new(
            "Low Stock",
            stock.low_stock_count.saturating_sub(stock.critical_stock_count) as f64,
            ORANGE,
        ),
        Segment::new("Critical Stock", stock.critical_stock_count as f64, RED),
    ];

    let stress = &report.detailed_reports.stress_test;
    let stress_results = [
        Segment::new("Passed", stress.count_status(TestStatus::Passed) as f64, GREEN),
        Segment::new("Failed", stress.count_status(TestStatus::Failed) as f64, RED),
        Segment::new("Warnings", stress.count_status(TestStatus::Warning) as f64, ORANGE),
    ];
    let stress_max = stress_results
        .iter()
        .map(|segment| segment.value)
        .fold(0.0, f64::max);

    let mut body = bar_chart(0.0, 50.0, "Component Scores", &components, 100.0);
    body.push_str(&pie_chart(PANEL_WIDTH, 50.0, "Inventory Stock Levels", &stock_levels));
    body.push_str(&bar_chart(
        PANEL_WIDTH * 2.0,
        50.0,
        "Stress Test Results",
        &stress_results,
        stress_max,
    ));
    document(
        PANEL_WIDTH * 3.0,
        PANEL_HEIGHT + 60.0,
        &format!(
            "Procurement Agent Audit Dashboard ({:.0}/100, {} risk)",
            report.overall_health_score, report.risk_level
        ),
        &body,
    )
}
