use std::fmt::{self, Write as _};

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::procurement::desk::audit::integrity::{
    AuditTrail, ComplianceAuditReport, IntegrityValidator,
};
use crate::procurement::desk::audit::resilience::{ResilienceAuditor, ResilienceReport};
use crate::procurement::desk::audit::stress::{StressTestReport, StressTester};
use crate::procurement::desk::audit::{TestStatus, timestamp_now};
use crate::procurement::desk::config::PolicyConfig;
use crate::procurement::desk::error::Result;
use crate::procurement::desk::model::Material;

/// Overall scores at or above this are low risk.
pub const LOW_RISK_SCORE: f64 = 90.0;
/// Overall scores at or above this are medium risk.
pub const MEDIUM_RISK_SCORE: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= LOW_RISK_SCORE {
            RiskLevel::Low
        } else if score >= MEDIUM_RISK_SCORE {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            RiskLevel::Low => "Agent is operating within acceptable parameters",
            RiskLevel::Medium => "Monitor agent performance and address identified issues",
            RiskLevel::High => "Immediate attention required - multiple critical issues detected",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalFinding {
    pub category: String,
    pub severity: Severity,
    pub issue: String,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub resilience: f64,
    pub compliance: f64,
    pub stress_resistance: f64,
}

impl ComponentScores {
    /// Scores with their display labels.
    pub fn labelled(&self) -> [(&'static str, f64); 3] {
        [
            ("Resilience", self.resilience),
            ("Compliance", self.compliance),
            ("Stress Resistance", self.stress_resistance),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedReports {
    pub resilience: ResilienceReport,
    pub compliance: ComplianceAuditReport,
    pub stress_test: StressTestReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_items_audited: usize,
    pub low_stock_items: usize,
    pub substitute_coverage: String,
    pub compliance_violations: usize,
    pub stress_test_pass_rate: String,
    pub next_audit_recommended: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterAuditReport {
    pub audit_id: Uuid,
    pub audit_timestamp: String,
    pub overall_health_score: f64,
    pub risk_level: RiskLevel,
    pub recommendation: String,
    pub component_scores: ComponentScores,
    pub detailed_reports: DetailedReports,
    pub critical_findings: Vec<CriticalFinding>,
    pub audit_summary: AuditSummary,
}

/// Runs the resilience, integrity and stress auditors and folds their scores
/// into one health score.
#[derive(Debug, Clone)]
pub struct MasterAuditor {
    resilience: ResilienceAuditor,
    integrity: IntegrityValidator,
    stress: StressTester,
}

impl MasterAuditor {
    pub fn new(policy: &PolicyConfig) -> Result<Self> {
        Ok(Self {
            resilience: ResilienceAuditor::new(policy.clone()),
            integrity: IntegrityValidator::new(policy.clone())?,
            stress: StressTester::new(policy.clone()),
        })
    }

    #[instrument(level = "info", skip_all, fields(count = materials.len()))]
    pub fn run_comprehensive_audit<R: Rng + ?Sized>(
        &self,
        materials: &[Material],
        raw_records: &[Value],
        trail: AuditTrail<'_>,
        rng: &mut R,
    ) -> Result<MasterAuditReport> {
        let resilience = self.resilience.generate_report(materials)?;
        let compliance = self.integrity.generate_report(raw_records, trail)?;
        let stress_test = self.stress.generate_report(materials, rng)?;

        let component_scores = ComponentScores {
            resilience: resilience.resilience_score,
            compliance: f64::from(compliance.compliance_score),
            stress_resistance: stress_test.resilience_percentage,
        };
        let overall = (component_scores.resilience
            + component_scores.compliance
            + component_scores.stress_resistance)
            / 3.0;
        let risk_level = RiskLevel::from_score(overall);
        info!(overall, %risk_level, "audit complete");

        let critical_findings = extract_critical_findings(&resilience, &compliance, &stress_test);
        let audit_summary = AuditSummary {
            total_items_audited: resilience.spec_matching.total_tests,
            low_stock_items: resilience.stock_analysis.low_stock_count,
            substitute_coverage: format!(
                "{:.1}%",
                resilience.substitute_analysis.substitute_coverage
            ),
            compliance_violations: compliance.total_violations,
            stress_test_pass_rate: format!("{:.1}%", stress_test.resilience_percentage),
            next_audit_recommended: "30 days".to_string(),
        };

        Ok(MasterAuditReport {
            audit_id: Uuid::new_v4(),
            audit_timestamp: timestamp_now()?,
            overall_health_score: (overall * 10.0).round() / 10.0,
            risk_level,
            recommendation: risk_level.recommendation().to_string(),
            component_scores,
            detailed_reports: DetailedReports {
                resilience,
                compliance,
                stress_test,
            },
            critical_findings,
            audit_summary,
        })
    }
}

pub fn extract_critical_findings(
    resilience: &ResilienceReport,
    compliance: &ComplianceAuditReport,
    stress: &StressTestReport,
) -> Vec<CriticalFinding> {
    let mut findings = Vec::new();

    if resilience.resilience_score < MEDIUM_RISK_SCORE {
        findings.push(CriticalFinding {
            category: "resilience".to_string(),
            severity: Severity::High,
            issue: format!(
                "Low resilience score: {:.1}/100",
                resilience.resilience_score
            ),
            impact: "Agent may make incorrect procurement decisions".to_string(),
        });
    }

    let critical_violations = compliance
        .violations
        .iter()
        .filter(|violation| violation.is_critical())
        .count();
    if critical_violations > 0 {
        findings.push(CriticalFinding {
            category: "compliance".to_string(),
            severity: Severity::High,
            issue: format!("{critical_violations} critical compliance violations"),
            impact: "Regulatory non-compliance and audit failures".to_string(),
        });
    }

    let failed_stress_tests = stress
        .data_corruption_tests
        .iter()
        .chain(&stress.extreme_value_tests)
        .chain(&stress.edge_case_tests)
        .filter(|probe| probe.status == TestStatus::Failed)
        .count();
    if failed_stress_tests > 0 {
        findings.push(CriticalFinding {
            category: "stress_resistance".to_string(),
            severity: Severity::Medium,
            issue: format!("{failed_stress_tests} stress test failures"),
            impact: "Agent may fail under adverse conditions".to_string(),
        });
    }

    findings
}

/// Stakeholder-facing console summary.
pub fn render_executive_summary(report: &MasterAuditReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "EXECUTIVE SUMMARY - PROCUREMENT AGENT AUDIT");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Audit ID: {}", report.audit_id);
    let _ = writeln!(out, "Overall Health Score: {}/100", report.overall_health_score);
    let _ = writeln!(out, "Risk Level: {}", report.risk_level);
    let _ = writeln!(out, "Recommendation: {}", report.recommendation);
    let _ = writeln!(out);
    let _ = writeln!(out, "Component Scores:");
    for (label, score) in report.component_scores.labelled() {
        let _ = writeln!(out, "  {label}: {score:.1}/100");
    }
    let _ = writeln!(out);

    let summary = &report.audit_summary;
    let _ = writeln!(out, "Key Metrics:");
    let _ = writeln!(out, "  Low Stock Items: {}", summary.low_stock_items);
    let _ = writeln!(out, "  Substitute Coverage: {}", summary.substitute_coverage);
    let _ = writeln!(out, "  Compliance Violations: {}", summary.compliance_violations);
    let _ = writeln!(out, "  Stress Test Pass Rate: {}", summary.stress_test_pass_rate);
    let _ = writeln!(out);

    if report.critical_findings.is_empty() {
        let _ = writeln!(out, "No critical findings identified.");
    } else {
        let _ = writeln!(out, "Critical Findings:");
        for finding in &report.critical_findings {
            let severity = match finding.severity {
                Severity::High => "HIGH",
                Severity::Medium => "MEDIUM",
            };
            let _ = writeln!(out, "  [{severity}] {}", finding.issue);
            let _ = writeln!(out, "    Impact: {}", finding.impact);
        }
    }
    let _ = writeln!(
        out,
        "\nNext audit recommended: {}",
        summary.next_audit_recommended
    );
    out
}
