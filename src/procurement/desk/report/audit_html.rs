use std::fmt::Write as _;

use crate::procurement::desk::audit::master::{MasterAuditReport, Severity};
use crate::procurement::desk::report::charts::audit_chart_svg;
use crate::procurement::desk::report::escape_html;

/// Scores at or above this render as low risk.
const LOW_RISK_CLASS: f64 = 85.0;
/// Scores at or above this render as medium risk.
const MEDIUM_RISK_CLASS: f64 = 70.0;

const AUDIT_STYLE: &str = r#"
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; padding: 20px; background: #f5f5f5; }
        .container { max-width: 1200px; margin: 0 auto; background: white; padding: 30px; border-radius: 10px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); }
        .header { text-align: center; margin-bottom: 30px; border-bottom: 3px solid #2196F3; padding-bottom: 20px; }
        .score-card { display: flex; justify-content: space-around; margin: 30px 0; }
        .score { text-align: center; padding: 20px; border-radius: 10px; color: white; font-weight: bold; }
        .score.high { background: #f44336; }
        .score.medium { background: #ff9800; }
        .score.low { background: #4caf50; }
        .metrics-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 20px; margin: 30px 0; }
        .metric-card { background: #f8f9fa; padding: 20px; border-radius: 8px; border-left: 4px solid #2196F3; }
        .metric-title { font-weight: bold; color: #333; margin-bottom: 10px; }
        .metric-value { font-size: 24px; font-weight: bold; }
        .findings { background: #fff3cd; border: 1px solid #ffeaa7; border-radius: 8px; padding: 20px; margin: 20px 0; }
        .finding { margin: 10px 0; padding: 10px; border-radius: 5px; }
        .finding.high { background: #ffebee; border-left: 4px solid #f44336; }
        .finding.medium { background: #fff3e0; border-left: 4px solid #ff9800; }
        .table { width: 100%; border-collapse: collapse; margin: 20px 0; }
        .table th, .table td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }
        .table th { background: #2196F3; color: white; }
        .status-pass { color: #4caf50; font-weight: bold; }
        .status-fail { color: #f44336; font-weight: bold; }
        .status-warn { color: #ff9800; font-weight: bold; }
        .charts { overflow-x: auto; margin-top: 30px; }
"#;

/// CSS class for a 0-100 score.
pub fn risk_class(score: f64) -> &'static str {
    if score >= LOW_RISK_CLASS {
        "low"
    } else if score >= MEDIUM_RISK_CLASS {
        "medium"
    } else {
        "high"
    }
}

fn class_color(class: &str) -> &'static str {
    match class {
        "low" => "#4caf50",
        "medium" => "#ff9800",
        _ => "#f44336",
    }
}

/// Full audit page for a master report, charts inlined.
pub fn render_audit_html(report: &MasterAuditReport, generated_at: &str) -> String {
    let class = risk_class(report.overall_health_score);
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    \
         <title>Procurement Agent Audit Report</title>\n    <style>{AUDIT_STYLE}    </style>\n</head>\n<body>\n"
    );
    html.push_str("<div class=\"container\">\n");
    let _ = writeln!(
        html,
        "<div class=\"header\"><h1>Procurement Agent Audit Report</h1><p>Generated: {}</p><p>Audit ID: {}</p></div>",
        escape_html(generated_at),
        report.audit_id
    );
    let _ = writeln!(
        html,
        "<div class=\"score-card\">\
         <div class=\"score {class}\"><h2>{:.0}/100</h2><p>Overall Health Score</p></div>\
         <div class=\"score {class}\"><h2>{}</h2><p>Risk Level</p></div></div>",
        report.overall_health_score, report.risk_level
    );
    let _ = writeln!(
        html,
        "<div class=\"findings\"><h3>Executive Summary</h3><p><strong>Recommendation:</strong> {}</p></div>",
        escape_html(&report.recommendation)
    );

    component_scores(&mut html, report);
    key_metrics(&mut html, report);
    critical_findings(&mut html, report);
    detailed_analysis(&mut html, report);

    html.push_str("<div class=\"charts\">\n");
    html.push_str(&audit_chart_svg(report));
    html.push_str("</div>\n</div>\n</body>\n</html>\n");
    html
}

fn component_scores(html: &mut String, report: &MasterAuditReport) {
    html.push_str("<div class=\"metrics-grid\">\n");
    for (label, score) in report.component_scores.labelled() {
        let _ = writeln!(
            html,
            "<div class=\"metric-card\"><div class=\"metric-title\">{label}</div>\
             <div class=\"metric-value\" style=\"color: {}\">{score:.0}/100</div></div>",
            class_color(risk_class(score))
        );
    }
    html.push_str("</div>\n");
}

fn key_metrics(html: &mut String, report: &MasterAuditReport) {
    let summary = &report.audit_summary;
    html.push_str(
        "<h3>Key Metrics</h3>\n<table class=\"table\">\n<thead><tr><th>Metric</th><th>Value</th></tr></thead>\n<tbody>\n",
    );
    for (metric, value) in [
        ("Total Items Audited", summary.total_items_audited.to_string()),
        ("Low Stock Items", summary.low_stock_items.to_string()),
        ("Substitute Coverage", summary.substitute_coverage.clone()),
        ("Compliance Violations", summary.compliance_violations.to_string()),
        ("Stress Test Pass Rate", summary.stress_test_pass_rate.clone()),
        ("Next Audit Recommended", summary.next_audit_recommended.clone()),
    ] {
        let _ = writeln!(
            html,
            "<tr><td>{metric}</td><td>{}</td></tr>",
            escape_html(&value)
        );
    }
    html.push_str("</tbody>\n</table>\n");
}

fn critical_findings(html: &mut String, report: &MasterAuditReport) {
    if report.critical_findings.is_empty() {
        html.push_str(
            "<div class=\"findings\"><h3>No Critical Findings</h3>\
             <p>All systems operating within acceptable parameters.</p></div>\n",
        );
        return;
    }
    html.push_str("<h3>Critical Findings</h3>\n");
    for finding in &report.critical_findings {
        let (class, label) = match finding.severity {
            Severity::High => ("high", "HIGH"),
            Severity::Medium => ("medium", "MEDIUM"),
        };
        let _ = writeln!(
            html,
            "<div class=\"finding {class}\"><strong>[{label}]</strong> {}<br><em>Impact:</em> {}</div>",
            escape_html(&finding.issue),
            escape_html(&finding.impact)
        );
    }
}

fn detailed_analysis(html: &mut String, report: &MasterAuditReport) {
    let resilience = &report.detailed_reports.resilience;
    let compliance = &report.detailed_reports.compliance;
    let stress = &report.detailed_reports.stress_test;
    let stock = &resilience.stock_analysis;

    let low_stock_status = match stock.low_stock_count {
        0 => "pass",
        1..=5 => "warn",
        _ => "fail",
    };
    let critical_status = if stock.critical_stock_count > 0 { "fail" } else { "pass" };
    let coverage = resilience.substitute_analysis.substitute_coverage;
    let coverage_status = if coverage == 0.0 {
        "fail"
    } else if coverage < 50.0 {
        "warn"
    } else {
        "pass"
    };
    let violations_status = if compliance.total_violations == 0 { "pass" } else { "fail" };
    let stress_status = if stress.resilience_percentage >= 80.0 {
        "pass"
    } else if stress.resilience_percentage >= 60.0 {
        "warn"
    } else {
        "fail"
    };

    html.push_str("<h3>Detailed Analysis</h3>\n");
    let _ = writeln!(
        html,
        "<h4>Specification Matching</h4>\n<p>Accuracy: <span class=\"status-pass\">{:.1}%</span> ({} correct out of {} tests)</p>",
        resilience.spec_matching.accuracy * 100.0,
        resilience.spec_matching.correct,
        resilience.spec_matching.total_tests
    );
    let _ = writeln!(
        html,
        "<h4>Stock Analysis</h4>\n<ul>\n<li>Total Items: {}</li>\n\
         <li>Low Stock Items: <span class=\"status-{low_stock_status}\">{}</span></li>\n\
         <li>Critical Stock Items: <span class=\"status-{critical_status}\">{}</span></li>\n</ul>",
        stock.total_items, stock.low_stock_count, stock.critical_stock_count
    );
    let _ = writeln!(
        html,
        "<h4>Substitute Coverage</h4>\n<p>Coverage: <span class=\"status-{coverage_status}\">{coverage:.1}%</span></p>"
    );
    let _ = writeln!(
        html,
        "<h4>Compliance Status</h4>\n<p>Score: <span class=\"status-pass\">{}/100</span></p>\n\
         <p>Violations: <span class=\"status-{violations_status}\">{}</span></p>",
        compliance.compliance_score, compliance.total_violations
    );
    let _ = writeln!(
        html,
        "<h4>Stress Test Results</h4>\n<p>Pass Rate: <span class=\"status-{stress_status}\">{:.1}%</span></p>",
        stress.resilience_percentage
    );
}
