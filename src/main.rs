use std::path::PathBuf;

use clap::{Parser, Subcommand};
use procurement_desk::audit::master::render_executive_summary;
use procurement_desk::compare::{compare_suppliers, render_comparison};
use procurement_desk::compliance::render_compliance_overview;
use procurement_desk::decision::evaluate_purchase;
use procurement_desk::generate::seeded_rng;
use procurement_desk::io::materials::load_materials;
use procurement_desk::llm::build_model;
use procurement_desk::model::Material;
use procurement_desk::portal::{portal_session, render_portal};
use procurement_desk::report::audit_text::{
    render_compliance_report, render_resilience_report, render_stress_report,
};
use procurement_desk::report::{AUDIT_HTML_FILE, AUDIT_SVG_FILE, DASHBOARD_HTML_FILE};
use procurement_desk::substitution::{propose_substitution, render_proposal};
use procurement_desk::{DeskConfig, Result, ToolError, sync, workflow};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(cli.verbose).and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    let mut config = DeskConfig::load(cli.config.as_deref())?;
    if cli.offline {
        config.llm.offline = true;
    }

    match cli.command {
        Command::Generate { seed } => {
            let mut rng = seeded_rng(seed.or(config.generator.seed));
            let materials = workflow::generate_store(&config, &mut rng)?;
            println!(
                "Generated {} materials in {}",
                materials.len(),
                config.paths.data_file.display()
            );
        }
        Command::Check { limit } => {
            let materials = load_materials(&config.paths.data_file)?;
            print!("{}", render_compliance_overview(&materials, limit));
        }
        Command::Evaluate { proposed, current } => {
            let materials = load_materials(&config.paths.data_file)?;
            let proposed = find_sku(&materials, &proposed)?;
            let current = find_sku(&materials, &current)?;
            let decision = evaluate_purchase(proposed, current, config.policy.price_threshold);
            println!(
                "Proposed: {} (${}) - {}",
                proposed.sku, proposed.price, proposed.technical_specs
            );
            println!(
                "Current: {} (${}) - {}",
                current.sku, current.price, current.technical_specs
            );
            println!("Result: {decision}");
        }
        Command::Compare { json } => {
            let materials = load_materials(&config.paths.data_file)?;
            let report = compare_suppliers(&materials);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_comparison(&report));
            }
        }
        Command::Portal => {
            let model = build_model(&config.llm)?;
            let run = portal_session(&config.paths, model.as_ref())?;
            print!("{}", render_portal(&run));
        }
        Command::Substitute { force_sku } => {
            let model = build_model(&config.llm)?;
            let proposal = propose_substitution(&config, model.as_ref(), force_sku.as_deref())?;
            print!("{}", render_proposal(proposal.as_ref()));
        }
        Command::Audit { kind } => run_audit(&config, kind)?,
        Command::Report { kind } => run_report(&config, kind)?,
        Command::Export { output } => {
            sync::json_to_excel(&config.paths.data_file, &output)?;
            println!("Workbook saved to {}", output.display());
        }
        Command::Import { input } => {
            if !input.exists() {
                return Err(ToolError::MissingInput(input));
            }
            sync::excel_to_json(&input, &config.paths.data_file)?;
            println!("Material store rebuilt in {}", config.paths.data_file.display());
        }
        Command::Ask { prompt } => {
            let model = build_model(&config.llm)?;
            println!("{}", model.complete(&prompt.join(" "))?);
        }
        Command::Run => {
            let model = build_model(&config.llm)?;
            let mut rng = seeded_rng(config.generator.seed);
            println!("AGENTIC PROCUREMENT SYSTEM");
            println!("Comprehensive Compliance & Procurement Analysis");
            println!("{}", "=".repeat(60));
            let outcomes = workflow::run_full_system(&config, model.as_ref(), &mut rng);
            for outcome in &outcomes {
                println!("\nRunning {}...", outcome.step);
                println!("{}", "=".repeat(60));
                if outcome.succeeded {
                    print!("{}", outcome.output);
                } else {
                    println!("Error: {}", outcome.output);
                }
            }
            let failed = outcomes.iter().filter(|outcome| !outcome.succeeded).count();
            println!("\n{}", "=".repeat(60));
            println!(
                "FULL SYSTEM RUN COMPLETE: {} of {} steps succeeded",
                outcomes.len() - failed,
                outcomes.len()
            );
        }
    }
    Ok(())
}

fn run_audit(config: &DeskConfig, kind: AuditKind) -> Result<()> {
    match kind {
        AuditKind::Resilience => {
            let report = workflow::resilience_audit(config)?;
            print!("{}", render_resilience_report(&report));
            report_saved(config, workflow::RESILIENCE_REPORT_FILE);
        }
        AuditKind::Integrity => {
            let report = workflow::integrity_audit(config)?;
            print!("{}", render_compliance_report(&report));
            report_saved(config, workflow::COMPLIANCE_REPORT_FILE);
        }
        AuditKind::Stress => {
            let mut rng = seeded_rng(config.generator.seed);
            let report = workflow::stress_audit(config, &mut rng)?;
            print!("{}", render_stress_report(&report));
            report_saved(config, workflow::STRESS_REPORT_FILE);
        }
        AuditKind::Master => {
            let mut rng = seeded_rng(config.generator.seed);
            let report = workflow::run_audit(config, &mut rng)?;
            print!("{}", render_executive_summary(&report));
            report_saved(config, workflow::MASTER_REPORT_FILE);
            report_saved(config, AUDIT_HTML_FILE);
        }
    }
    Ok(())
}

fn run_report(config: &DeskConfig, kind: ReportKind) -> Result<()> {
    let generated_at = workflow::now_display();
    match kind {
        ReportKind::Summary => {
            print!("{}", workflow::system_report(&config.paths, &generated_at)?);
        }
        ReportKind::Dashboard => {
            let stats = workflow::render_dashboards(&config.paths, &generated_at)?;
            println!(
                "Dashboard for {} materials ({} ready for R&D)",
                stats.total_materials, stats.ready_for_rd
            );
            report_saved(config, DASHBOARD_HTML_FILE);
        }
        ReportKind::Audit => {
            let report = workflow::render_saved_audit(&config.paths, &generated_at)?;
            println!(
                "Audit {}: {}/100 ({} risk)",
                report.audit_id, report.overall_health_score, report.risk_level
            );
            report_saved(config, AUDIT_HTML_FILE);
            report_saved(config, AUDIT_SVG_FILE);
        }
    }
    Ok(())
}

fn report_saved(config: &DeskConfig, name: &str) {
    println!("Saved {}", config.paths.output(name).display());
}

fn find_sku<'a>(materials: &'a [Material], sku: &str) -> Result<&'a Material> {
    materials
        .iter()
        .find(|material| material.sku == sku)
        .ok_or_else(|| ToolError::UnknownSku(sku.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Raw-material procurement desk: compliance tracking, supplier comparison and audits."
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Draft emails locally instead of calling the hosted model.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a synthetic material store.
    Generate {
        /// Seed for reproducible data.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the compliance status of the first materials.
    Check {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Evaluate a proposed purchase against the current item.
    Evaluate {
        /// SKU of the proposed item.
        #[arg(long)]
        proposed: String,
        /// SKU of the item currently in use.
        #[arg(long)]
        current: String,
    },
    /// Compare price against compliance for chemicals with several suppliers.
    Compare {
        /// Print the comparison as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Simulate one supplier portal session.
    Portal,
    /// Propose a supplier switch for a low-stock item.
    Substitute {
        /// Force this SKU to a low-stock level for the run.
        #[arg(long)]
        force_sku: Option<String>,
    },
    /// Run an audit and save its JSON report.
    Audit {
        #[command(subcommand)]
        kind: AuditKind,
    },
    /// Render a report or dashboard.
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },
    /// Export the store to an Excel workbook.
    Export {
        #[arg(long, default_value = "raw_materials.xlsx")]
        output: PathBuf,
    },
    /// Rebuild the store from an Excel workbook.
    Import {
        #[arg(long)]
        input: PathBuf,
    },
    /// Send a free-form prompt to the language model.
    Ask {
        #[arg(required = true)]
        prompt: Vec<String>,
    },
    /// Run the full system end to end.
    Run,
}

#[derive(Clone, Copy, Subcommand)]
enum AuditKind {
    /// Decision accuracy, stock levels and substitute coverage.
    Resilience,
    /// Data integrity, business rules and audit trail.
    Integrity,
    /// Corrupted, extreme and edge-case inputs.
    Stress,
    /// All of the above with an overall health score.
    Master,
}

#[derive(Clone, Copy, Subcommand)]
enum ReportKind {
    /// Plain-text system report.
    Summary,
    /// HTML dashboard with SVG charts.
    Dashboard,
    /// HTML audit report from the saved master audit.
    Audit,
}
