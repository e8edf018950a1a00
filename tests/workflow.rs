mod common;

use common::{ScriptedModel, config_in};
use procurement_desk::generate::seeded_rng;
use procurement_desk::io::materials::load_materials;
use procurement_desk::report::{DASHBOARD_HTML_FILE, DASHBOARD_SVG_FILE, SYSTEM_REPORT_FILE};
use procurement_desk::workflow::{generate_store, run_full_system};
use tempfile::tempdir;

#[test]
fn full_run_completes_every_step() {
    let temp_dir = tempdir().expect("temporary directory");
    let config = config_in(temp_dir.path());
    let model = ScriptedModel("Subject: Sample request\n\nPlease send a sample.");

    let outcomes = run_full_system(&config, &model, &mut seeded_rng(Some(11)));

    let steps: Vec<&str> = outcomes.iter().map(|outcome| outcome.step).collect();
    assert_eq!(
        steps,
        vec![
            "Raw Materials Data Generation",
            "Compliance Status Check",
            "Supplier Portal Simulation",
            "Price vs Compliance Analysis",
            "System Report",
            "Dashboards",
        ]
    );
    for outcome in &outcomes {
        assert!(outcome.succeeded, "{} failed: {}", outcome.step, outcome.output);
    }
    assert!(outcomes[1].output.starts_with("Compliance Check Results:"));

    for artefact in [SYSTEM_REPORT_FILE, DASHBOARD_HTML_FILE, DASHBOARD_SVG_FILE] {
        assert!(config.paths.output(artefact).exists(), "{artefact} missing");
    }
    let materials = load_materials(&config.paths.data_file).expect("store written");
    assert_eq!(materials.len(), 50);
}

#[test]
fn steps_after_a_failure_still_run() {
    let temp_dir = tempdir().expect("temporary directory");
    let mut config = config_in(temp_dir.path());
    let blocked = temp_dir.path().join("raw_materials.json");
    std::fs::create_dir(&blocked).expect("directory in place of the store");
    config.paths.data_file = blocked;

    let outcomes = run_full_system(&config, &ScriptedModel("unused"), &mut seeded_rng(Some(1)));

    assert_eq!(outcomes.len(), 6);
    assert!(outcomes.iter().all(|outcome| !outcome.succeeded));
}

#[test]
fn seeded_generation_is_reproducible() {
    let first_dir = tempdir().expect("temporary directory");
    let second_dir = tempdir().expect("temporary directory");

    let first = generate_store(&config_in(first_dir.path()), &mut seeded_rng(Some(3)))
        .expect("first store");
    let second = generate_store(&config_in(second_dir.path()), &mut seeded_rng(Some(3)))
        .expect("second store");

    assert_eq!(first, second);
}
