//! Multi-step flows shared by the CLI commands: store generation, audits and
//! the rendered artefacts that go with them.

use std::fs;
use std::path::PathBuf;

use rand::Rng;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{error, info, instrument};

use crate::procurement::desk::audit::integrity::{AuditTrail, ComplianceAuditReport};
use crate::procurement::desk::audit::{
    IntegrityValidator, MasterAuditReport, MasterAuditor, ResilienceAuditor, ResilienceReport,
    StressTestReport, StressTester,
};
use crate::procurement::desk::compare::{compare_suppliers, render_comparison};
use crate::procurement::desk::compliance::render_compliance_overview;
use crate::procurement::desk::config::{DeskConfig, PathsConfig};
use crate::procurement::desk::error::{Result, ToolError};
use crate::procurement::desk::generate::generate_materials;
use crate::procurement::desk::io::materials::{
    load_materials, load_raw, save_materials, write_artifact, write_json,
};
use crate::procurement::desk::llm::LanguageModel;
use crate::procurement::desk::model::Material;
use crate::procurement::desk::portal::{portal_session, render_portal};
use crate::procurement::desk::report::audit_html::render_audit_html;
use crate::procurement::desk::report::charts::{audit_chart_svg, inventory_chart_svg};
use crate::procurement::desk::report::dashboard::render_dashboard_html;
use crate::procurement::desk::report::summary::render_system_report;
use crate::procurement::desk::report::{
    AUDIT_HTML_FILE, AUDIT_SVG_FILE, DASHBOARD_HTML_FILE, DASHBOARD_SVG_FILE, InventoryStats,
    SYSTEM_REPORT_FILE, display_timestamp,
};
use crate::procurement::desk::substitution::SUPPLIER_SWITCH_FILE;

pub const RESILIENCE_REPORT_FILE: &str = "resilience_audit_report.json";
pub const COMPLIANCE_REPORT_FILE: &str = "compliance_audit_report.json";
pub const STRESS_REPORT_FILE: &str = "stress_test_report.json";
pub const MASTER_REPORT_FILE: &str = "master_audit_report.json";

/// Materials listed by the compliance overview step of a full run.
const OVERVIEW_LIMIT: usize = 5;

/// Outcome of one step of [`run_full_system`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: &'static str,
    pub succeeded: bool,
    /// Console output on success, the error message otherwise.
    pub output: String,
}

/// Generates a fresh store and writes it to the configured data file.
#[instrument(level = "info", skip_all, fields(data_file = %config.paths.data_file.display()))]
pub fn generate_store<R: Rng + ?Sized>(config: &DeskConfig, rng: &mut R) -> Result<Vec<Material>> {
    let materials = generate_materials(&config.generator, rng);
    save_materials(&config.paths.data_file, &materials)?;
    info!(count = materials.len(), "material store generated");
    Ok(materials)
}

/// Writes the text system report and returns its contents.
pub fn system_report(paths: &PathsConfig, generated_at: &str) -> Result<String> {
    let materials = load_materials(&paths.data_file)?;
    let stats = InventoryStats::from_materials(&materials)?;
    let report = render_system_report(&stats, generated_at);
    write_artifact(&paths.output(SYSTEM_REPORT_FILE), &report)?;
    Ok(report)
}

/// Writes the HTML dashboard and its SVG chart panel.
#[instrument(level = "info", skip_all, fields(output_dir = %paths.output_dir.display()))]
pub fn render_dashboards(paths: &PathsConfig, generated_at: &str) -> Result<InventoryStats> {
    let materials = load_materials(&paths.data_file)?;
    let stats = InventoryStats::from_materials(&materials)?;
    write_artifact(
        &paths.output(DASHBOARD_HTML_FILE),
        &render_dashboard_html(&stats, generated_at),
    )?;
    write_artifact(&paths.output(DASHBOARD_SVG_FILE), &inventory_chart_svg(&stats))?;
    Ok(stats)
}

fn audit_trail(paths: &PathsConfig) -> (PathBuf, PathBuf) {
    (paths.data_file.clone(), paths.output(SUPPLIER_SWITCH_FILE))
}

pub fn resilience_audit(config: &DeskConfig) -> Result<ResilienceReport> {
    let materials = load_materials(&config.paths.data_file)?;
    let report = ResilienceAuditor::new(config.policy.clone()).generate_report(&materials)?;
    write_json(&config.paths.output(RESILIENCE_REPORT_FILE), &report)?;
    Ok(report)
}

pub fn integrity_audit(config: &DeskConfig) -> Result<ComplianceAuditReport> {
    let records = load_raw(&config.paths.data_file)?;
    let (data_file, email_record) = audit_trail(&config.paths);
    let report = IntegrityValidator::new(config.policy.clone())?.generate_report(
        &records,
        AuditTrail {
            data_file: &data_file,
            email_record: &email_record,
        },
    )?;
    write_json(&config.paths.output(COMPLIANCE_REPORT_FILE), &report)?;
    Ok(report)
}

pub fn stress_audit<R: Rng + ?Sized>(config: &DeskConfig, rng: &mut R) -> Result<StressTestReport> {
    let materials = load_materials(&config.paths.data_file)?;
    let report = StressTester::new(config.policy.clone()).generate_report(&materials, rng)?;
    write_json(&config.paths.output(STRESS_REPORT_FILE), &report)?;
    Ok(report)
}

/// Runs every auditor, persists the four JSON reports and renders the HTML
/// report with its charts.
#[instrument(level = "info", skip_all, fields(data_file = %config.paths.data_file.display()))]
pub fn run_audit<R: Rng + ?Sized>(config: &DeskConfig, rng: &mut R) -> Result<MasterAuditReport> {
    let paths = &config.paths;
    let materials = load_materials(&paths.data_file)?;
    let records = load_raw(&paths.data_file)?;
    let (data_file, email_record) = audit_trail(paths);

    let report = MasterAuditor::new(&config.policy)?.run_comprehensive_audit(
        &materials,
        &records,
        AuditTrail {
            data_file: &data_file,
            email_record: &email_record,
        },
        rng,
    )?;

    let detailed = &report.detailed_reports;
    write_json(&paths.output(RESILIENCE_REPORT_FILE), &detailed.resilience)?;
    write_json(&paths.output(COMPLIANCE_REPORT_FILE), &detailed.compliance)?;
    write_json(&paths.output(STRESS_REPORT_FILE), &detailed.stress_test)?;
    write_json(&paths.output(MASTER_REPORT_FILE), &report)?;
    write_audit_artifacts(paths, &report, &now_display())?;
    Ok(report)
}

/// Renders the HTML audit report from a previously saved master report.
pub fn render_saved_audit(paths: &PathsConfig, generated_at: &str) -> Result<MasterAuditReport> {
    let path = paths.output(MASTER_REPORT_FILE);
    if !path.exists() {
        return Err(ToolError::MissingInput(path));
    }
    let report: MasterAuditReport = serde_json::from_str(&fs::read_to_string(&path)?)?;
    write_audit_artifacts(paths, &report, generated_at)?;
    Ok(report)
}

fn write_audit_artifacts(
    paths: &PathsConfig,
    report: &MasterAuditReport,
    generated_at: &str,
) -> Result<()> {
    write_artifact(
        &paths.output(AUDIT_HTML_FILE),
        &render_audit_html(report, generated_at),
    )?;
    write_artifact(&paths.output(AUDIT_SVG_FILE), &audit_chart_svg(report))
}

/// Current UTC time in the format shown on rendered reports.
pub fn now_display() -> String {
    display_timestamp(OffsetDateTime::now_utc())
}

/// Regenerates the store and walks through every stage of the desk. A
/// failing step is recorded and the run moves on.
#[instrument(level = "info", skip_all)]
pub fn run_full_system<R: Rng + ?Sized>(
    config: &DeskConfig,
    model: &dyn LanguageModel,
    rng: &mut R,
) -> Vec<StepOutcome> {
    let paths = &config.paths;
    let generated_at = now_display();
    let mut outcomes = Vec::new();

    outcomes.push(run_step(
        "Raw Materials Data Generation",
        generate_store(config, rng).map(|materials| {
            format!(
                "Generated {} materials in {}\n",
                materials.len(),
                paths.data_file.display()
            )
        }),
    ));
    outcomes.push(run_step(
        "Compliance Status Check",
        load_materials(&paths.data_file)
            .map(|materials| render_compliance_overview(&materials, OVERVIEW_LIMIT)),
    ));
    outcomes.push(run_step(
        "Supplier Portal Simulation",
        portal_session(paths, model).map(|run| render_portal(&run)),
    ));
    outcomes.push(run_step(
        "Price vs Compliance Analysis",
        load_materials(&paths.data_file)
            .map(|materials| render_comparison(&compare_suppliers(&materials))),
    ));
    outcomes.push(run_step(
        "System Report",
        system_report(paths, &generated_at),
    ));
    outcomes.push(run_step(
        "Dashboards",
        render_dashboards(paths, &generated_at).map(|_| {
            format!(
                "Dashboards saved to {} and {}\n",
                paths.output(DASHBOARD_HTML_FILE).display(),
                paths.output(DASHBOARD_SVG_FILE).display()
            )
        }),
    ));
    outcomes
}

fn run_step(step: &'static str, result: Result<String>) -> StepOutcome {
    match result {
        Ok(output) => {
            info!(step, "step complete");
            StepOutcome {
                step,
                succeeded: true,
                output,
            }
        }
        Err(failure) => {
            error!(step, error = %failure, "step failed");
            StepOutcome {
                step,
                succeeded: false,
                output: failure.to_string(),
            }
        }
    }
}
