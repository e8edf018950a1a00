use std::fmt::Write as _;

use crate::procurement::desk::model::DOCUMENT_COUNT;
use crate::procurement::desk::report::charts::inventory_chart_svg;
use crate::procurement::desk::report::{InventoryStats, escape_html};

const DASHBOARD_STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }
        .dashboard { max-width: 1200px; margin: 0 auto; }
        .header { text-align: center; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
                  color: white; padding: 20px; border-radius: 10px; margin-bottom: 20px; }
        .metrics-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr));
                        gap: 20px; margin-bottom: 20px; }
        .metric-card { background: white; padding: 20px; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .metric-value { font-size: 2em; font-weight: bold; color: #2c3e50; }
        .metric-label { color: #7f8c8d; margin-top: 5px; }
        .status-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; }
        .status-card { background: white; padding: 20px; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .status-item { display: flex; align-items: center; margin: 10px 0; }
        .status-dot { width: 12px; height: 12px; border-radius: 50%; margin-right: 10px; }
        .ready { background-color: #2ecc71; }
        .warning { background-color: #f39c12; }
        .progress-bar { width: 100%; height: 20px; background-color: #ecf0f1; border-radius: 10px; overflow: hidden; }
        .progress-fill { height: 100%; background: linear-gradient(90deg, #e74c3c 0%, #f39c12 50%, #2ecc71 100%); }
        .charts { background: white; margin-top: 20px; padding: 20px; border-radius: 10px; overflow-x: auto; }
        .footer { text-align: center; margin-top: 20px; color: #7f8c8d; }
"#;

/// Capability name and whether it runs without external services.
const SYSTEM_STATUS: [(&str, bool); 6] = [
    ("CAS-based Material Identification", true),
    ("11-Document Compliance Tracking", true),
    ("Multi-Supplier Price Analysis", true),
    ("Supplier Portal Simulation", true),
    ("AI Sample Request Generation", false),
    ("Excel Workbook Export", true),
];

/// Inventory dashboard page with the SVG charts inlined.
pub fn render_dashboard_html(stats: &InventoryStats, generated_at: &str) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    \
         <title>Agentic Procurement Dashboard</title>\n    <style>{DASHBOARD_STYLE}    </style>\n</head>\n<body>\n"
    );
    html.push_str("<div class=\"dashboard\">\n");
    html.push_str(
        "<div class=\"header\"><h1>Agentic Procurement System Dashboard</h1>\
         <p>Compliance &amp; Procurement Analytics</p></div>\n",
    );

    html.push_str("<div class=\"metrics-grid\">\n");
    for (value, label) in [
        (stats.total_materials.to_string(), "Total Materials"),
        (stats.ready_for_rd.to_string(), "Ready for R&amp;D"),
        (stats.unique_cas.to_string(), "Unique CAS Numbers"),
        (format!("${:.0}", stats.average_price), "Average Price"),
    ] {
        let _ = writeln!(
            html,
            "<div class=\"metric-card\"><div class=\"metric-value\">{}</div><div class=\"metric-label\">{label}</div></div>",
            escape_html(&value)
        );
    }
    html.push_str("</div>\n");

    let ready_percentage = stats.ready_percentage();
    html.push_str("<div class=\"status-grid\">\n<div class=\"status-card\">\n<h3>Compliance Overview</h3>\n");
    let _ = writeln!(
        html,
        "<div class=\"status-item\"><span>Ready for R&amp;D: {}/{} ({ready_percentage:.1}%)</span></div>",
        stats.ready_for_rd, stats.total_materials
    );
    let _ = writeln!(
        html,
        "<div class=\"progress-bar\"><div class=\"progress-fill\" style=\"width: {ready_percentage:.1}%\"></div></div>"
    );
    let _ = writeln!(
        html,
        "<div class=\"status-item\">Average Compliance Score: {:.1}/{DOCUMENT_COUNT} documents</div>",
        stats.average_compliance
    );
    let _ = writeln!(
        html,
        "<div class=\"status-item\">Materials Needing Documents: {}</div>",
        stats.needing_documents()
    );
    let _ = writeln!(
        html,
        "<div class=\"status-item\">Price Range: ${:.2} - ${:.2}</div>",
        stats.min_price, stats.max_price
    );
    html.push_str("</div>\n<div class=\"status-card\">\n<h3>System Status</h3>\n");
    for (name, ready) in SYSTEM_STATUS {
        let class = if ready { "ready" } else { "warning" };
        let _ = writeln!(
            html,
            "<div class=\"status-item\"><div class=\"status-dot {class}\"></div><span>{}</span></div>",
            escape_html(name)
        );
    }
    html.push_str("</div>\n</div>\n");

    html.push_str("<div class=\"charts\">\n");
    html.push_str(&inventory_chart_svg(stats));
    html.push_str("</div>\n");

    let _ = writeln!(
        html,
        "<div class=\"footer\"><p>Generated: {} | Agentic Procurement System</p></div>",
        escape_html(generated_at)
    );
    html.push_str("</div>\n</body>\n</html>\n");
    html
}
