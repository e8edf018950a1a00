use std::fmt::Write as _;

use crate::procurement::desk::audit::integrity::{ComplianceAuditReport, Violation};
use crate::procurement::desk::audit::resilience::ResilienceReport;
use crate::procurement::desk::audit::stress::{FailureScenario, StressTestReport};

pub fn render_resilience_report(report: &ResilienceReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== PROCUREMENT AGENT RESILIENCE AUDIT ===");
    let _ = writeln!(out, "Timestamp: {}", report.timestamp);
    let _ = writeln!(
        out,
        "Overall Resilience Score: {:.1}/100",
        report.resilience_score
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Specification Matching:");
    let _ = writeln!(
        out,
        "  Accuracy: {:.2}%",
        report.spec_matching.accuracy * 100.0
    );
    let _ = writeln!(out, "  Tests Run: {}", report.spec_matching.total_tests);
    let _ = writeln!(out);

    let stock = &report.stock_analysis;
    let _ = writeln!(out, "Stock Analysis:");
    let _ = writeln!(out, "  Low Stock Items: {}", stock.low_stock_count);
    let _ = writeln!(out, "  Critical Items: {}", stock.critical_stock_count);
    let _ = writeln!(out, "  Critical SKUs: {}", stock.critical_items.join(", "));
    let _ = writeln!(out);

    let substitutes = &report.substitute_analysis;
    let _ = writeln!(out, "Substitute Coverage:");
    let _ = writeln!(out, "  Coverage: {:.1}%", substitutes.substitute_coverage);
    let _ = writeln!(
        out,
        "  Items Without Substitutes: {}",
        substitutes.items_without_substitutes.len()
    );
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Price Threshold Violations: {}",
        report.price_compliance.len()
    );
    let _ = writeln!(
        out,
        "Compliance Violations: {}",
        report.compliance_violations.len()
    );
    for violation in &report.compliance_violations {
        let _ = writeln!(
            out,
            "  - {} vs {}: expected match {}, got {}",
            violation.item1, violation.item2, violation.expected_match, violation.decision
        );
    }
    out
}

pub fn render_compliance_report(report: &ComplianceAuditReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== PROCUREMENT AGENT COMPLIANCE AUDIT ===");
    let _ = writeln!(out, "Timestamp: {}", report.timestamp);
    let _ = writeln!(out, "Compliance Score: {}/100", report.compliance_score);
    let _ = writeln!(out);
    let _ = writeln!(out, "Violation Summary:");
    let summary = &report.summary;
    for (label, count) in [
        ("Data Integrity", summary.data_integrity),
        ("Business Rules", summary.business_rules),
        ("Decision Logic", summary.decision_logic),
        ("Audit Trail", summary.audit_trail),
    ] {
        let _ = writeln!(out, "  {label}: {count} violations");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Total Violations: {}", report.total_violations);
    let _ = writeln!(out, "Total Warnings: {}", report.total_warnings);

    let critical: Vec<&Violation> = report
        .violations
        .iter()
        .filter(|violation| violation.is_critical())
        .collect();
    if !critical.is_empty() {
        let _ = writeln!(out, "\nCritical Violations:");
        for violation in critical {
            let _ = writeln!(out, "  - {}", describe_violation(violation));
        }
    }
    out
}

fn describe_violation(violation: &Violation) -> String {
    match violation {
        Violation::MissingRequiredField { sku, field } => {
            format!("missing_required_field: {sku} lacks {field}")
        }
        Violation::InvalidSkuFormat {
            sku,
            expected_format,
        } => format!("invalid_sku_format: {sku} (expected {expected_format})"),
        Violation::InvalidPrice { sku, price } => format!("invalid_price: {sku} has {price}"),
        Violation::MissingTechnicalSpec { sku, missing_spec } => {
            format!("missing_technical_spec: {sku} lacks {missing_spec}")
        }
        Violation::DuplicateSku { sku } => format!("duplicate_sku: {sku}"),
        Violation::NegativeInventory { sku, days_on_hand } => {
            format!("negative_inventory: {sku} at {days_on_hand} days")
        }
        Violation::DecisionFunctionError {
            item1,
            item2,
            error,
        } => format!("decision_function_error: {item1} vs {item2}: {error}"),
        Violation::MissingAuditTrail { description } => {
            format!("missing_audit_trail: {description}")
        }
    }
}

pub fn render_stress_report(report: &StressTestReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== PROCUREMENT AGENT STRESS TEST ===");
    let _ = writeln!(out, "Timestamp: {}", report.timestamp);
    let _ = writeln!(
        out,
        "Overall Resilience: {:.1}%",
        report.resilience_percentage
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Test Results Summary:");
    for (label, probes) in [
        ("Data Corruption Tests", &report.data_corruption_tests),
        ("Extreme Value Tests", &report.extreme_value_tests),
        ("Concurrent Decision Tests", &report.concurrent_decision_tests),
        ("Edge Case Tests", &report.edge_case_tests),
    ] {
        let _ = writeln!(out, "  {label}: {} tests", probes.len());
        for probe in probes {
            let _ = writeln!(out, "    {}: {:?}", probe.test, probe.status);
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Failure Scenarios:");
    for scenario in &report.failure_scenarios {
        match scenario {
            FailureScenario::SupplyChainCrisis {
                low_stock_items,
                total_items,
                crisis_level,
            } => {
                let _ = writeln!(
                    out,
                    "  - supply_chain_crisis: {low_stock_items}/{total_items} low on stock ({crisis_level})"
                );
            }
            FailureScenario::NoSubstitutesAvailable {
                items_without_substitutes,
                risk_level,
            } => {
                let _ = writeln!(
                    out,
                    "  - no_substitutes_available: {items_without_substitutes} items without substitutes ({risk_level} risk)"
                );
            }
        }
    }

    let memory = &report.memory_usage_test;
    let _ = writeln!(out, "\nMemory Usage Test:");
    let _ = writeln!(out, "  Dataset Size: {} items", memory.dataset_size);
    let _ = writeln!(out, "  Memory Usage: {} bytes", memory.final_memory);
    let _ = writeln!(out, "  Status: {:?}", memory.status);
    out
}
