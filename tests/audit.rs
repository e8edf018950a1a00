mod common;

use std::fs;

use common::{aluminium, config_in, material, steel};
use procurement_desk::ToolError;
use procurement_desk::audit::TestStatus;
use procurement_desk::audit::integrity::{AuditTrail, Violation, Warning, compliance_score};
use procurement_desk::audit::master::{RiskLevel, render_executive_summary};
use procurement_desk::audit::{IntegrityValidator, MasterAuditor, ResilienceAuditor, StressTester};
use procurement_desk::config::PolicyConfig;
use procurement_desk::generate::seeded_rng;
use procurement_desk::io::materials::save_materials;
use procurement_desk::model::Material;
use procurement_desk::substitution::SUPPLIER_SWITCH_FILE;
use procurement_desk::workflow::{self, COMPLIANCE_REPORT_FILE, MASTER_REPORT_FILE};
use serde_json::{Value, json};
use tempfile::tempdir;

fn store() -> Vec<Material> {
    vec![
        material("SKU-0001-aaa", "Acme Corp", 120.0, aluminium()),
        material("SKU-0002-bbb", "Global Labs", 95.5, aluminium()),
        material("SKU-0003-ccc", "Acme Corp", 300.0, steel()),
    ]
}

fn raw(materials: &[Material]) -> Vec<Value> {
    materials
        .iter()
        .map(|material| serde_json::to_value(material).expect("serialised"))
        .collect()
}

#[test]
fn resilience_of_a_consistent_store_is_perfect() {
    let report = ResilienceAuditor::new(PolicyConfig::default())
        .generate_report(&store())
        .expect("report built");

    assert_eq!(report.spec_matching.total_tests, 3);
    assert_eq!(report.spec_matching.correct, 3);
    assert!(report.compliance_violations.is_empty());
    assert!(report.price_compliance.is_empty());
    assert_eq!(report.substitute_analysis.substitute_coverage, 100.0);
    assert_eq!(report.resilience_score, 100.0);
}

#[test]
fn stock_levels_split_into_low_and_critical() {
    let mut materials = store();
    materials[0].days_on_hand = 1;
    materials[2].days_on_hand = 4;
    let auditor = ResilienceAuditor::new(PolicyConfig::default());

    let stock = auditor.low_stock_detection(&materials);
    assert_eq!(stock.low_stock_count, 2);
    assert_eq!(stock.critical_items, vec!["SKU-0001-aaa".to_string()]);
    assert!((stock.low_stock_percentage - 200.0 / 3.0).abs() < 1e-9);

    let substitutes = auditor.substitute_availability(&materials);
    assert_eq!(substitutes.substitutes_found, 1);
    assert_eq!(substitutes.items_without_substitutes, vec!["SKU-0003-ccc".to_string()]);
    assert_eq!(substitutes.substitute_coverage, 50.0);
}

#[test]
fn empty_store_has_no_low_stock_percentage() {
    let stock = ResilienceAuditor::new(PolicyConfig::default()).low_stock_detection(&[]);
    assert_eq!(stock.total_items, 0);
    assert_eq!(stock.low_stock_percentage, 0.0);
}

#[test]
fn integrity_flags_schema_and_business_rule_breaches() {
    let validator = IntegrityValidator::new(PolicyConfig::default()).expect("validator built");
    let mut records = raw(&store());
    records[0]["SKU"] = json!("BAD-SKU");
    records[1]["Price"] = json!(-4.0);
    records[1]["TechnicalSpecs"] = json!({ "density": 2.7 });
    records[2]["SKU"] = json!("SKU-0002-bbb");
    records[2]["DaysOnHand"] = json!(-3);
    records[2]["LeadTime"] = json!(400);
    if let Value::Object(fields) = &mut records[0] {
        fields.remove("inci_name");
    }

    let violations = validator.validate_data_integrity(&records);
    assert!(violations.contains(&Violation::InvalidSkuFormat {
        sku: "BAD-SKU".to_string(),
        expected_format: "SKU-####-XXX".to_string(),
    }));
    assert!(violations.contains(&Violation::MissingRequiredField {
        sku: "BAD-SKU".to_string(),
        field: "inci_name".to_string(),
    }));
    assert!(violations.contains(&Violation::InvalidPrice {
        sku: "SKU-0002-bbb".to_string(),
        price: json!(-4.0),
    }));
    assert_eq!(
        violations
            .iter()
            .filter(|violation| matches!(violation, Violation::MissingTechnicalSpec { .. }))
            .count(),
        2
    );

    let (business, warnings) = validator.validate_business_rules(&records);
    assert!(business.contains(&Violation::DuplicateSku {
        sku: "SKU-0002-bbb".to_string()
    }));
    assert!(business.contains(&Violation::NegativeInventory {
        sku: "SKU-0002-bbb".to_string(),
        days_on_hand: -3,
    }));
    assert_eq!(
        warnings,
        vec![Warning::ExcessiveLeadTime {
            sku: "SKU-0002-bbb".to_string(),
            lead_time: 400,
        }]
    );
}

#[test]
fn unreadable_records_become_decision_errors() {
    let validator = IntegrityValidator::new(PolicyConfig::default()).expect("validator built");
    let mut records = raw(&store());
    records[1]["Price"] = json!("invalid");

    let violations = validator.validate_procurement_decisions(&records);
    assert_eq!(violations.len(), 2);
    assert!(violations.iter().all(Violation::is_critical));
}

#[test]
fn decisions_only_fail_on_the_fields_they_read() {
    let validator = IntegrityValidator::new(PolicyConfig::default()).expect("validator built");

    let mut records = raw(&store());
    records[2].as_object_mut().expect("object").remove("Price");
    assert!(validator.validate_procurement_decisions(&records).is_empty());

    let mut records = raw(&store());
    records[0].as_object_mut().expect("object").remove("Price");
    assert_eq!(validator.validate_procurement_decisions(&records).len(), 2);

    let mut records = raw(&store());
    records[2].as_object_mut().expect("object").remove("TechnicalSpecs");
    assert_eq!(validator.validate_procurement_decisions(&records).len(), 2);
}

#[test]
fn a_missing_name_is_one_violation_not_one_per_pair() {
    let dir = tempdir().expect("temporary directory");
    let email_record = dir.path().join(SUPPLIER_SWITCH_FILE);
    fs::write(&email_record, "switch").expect("email written");
    let data_file = dir.path().join("raw_materials.json");
    let mut records = raw(&[
        material("SKU-0001-aaa", "Acme Corp", 120.0, aluminium()),
        material("SKU-0002-bbb", "Global Labs", 95.5, aluminium()),
        material("SKU-0003-ccc", "Acme Corp", 300.0, steel()),
        material("SKU-0004-ddd", "Global Labs", 310.0, steel()),
        material("SKU-0005-eee", "Acme Corp", 45.0, aluminium()),
        material("SKU-0006-fff", "Global Labs", 52.0, steel()),
    ]);
    records[0].as_object_mut().expect("object").remove("inci_name");

    let report = IntegrityValidator::new(PolicyConfig::default())
        .expect("validator built")
        .generate_report(
            &records,
            AuditTrail {
                data_file: &data_file,
                email_record: &email_record,
            },
        )
        .expect("report built");

    assert_eq!(
        report.violations,
        vec![Violation::MissingRequiredField {
            sku: "SKU-0001-aaa".to_string(),
            field: "inci_name".to_string(),
        }]
    );
    assert_eq!(report.summary.decision_logic, 0);
    assert_eq!(report.compliance_score, 90);
}

#[test]
fn compliance_score_never_goes_negative() {
    assert_eq!(compliance_score(0, 0), 100);
    assert_eq!(compliance_score(2, 3), 74);
    assert_eq!(compliance_score(12, 0), 0);
}

#[test]
fn audit_trail_requires_the_switch_email() {
    let dir = tempdir().expect("temporary directory");
    let data_file = dir.path().join("raw_materials.json");
    let email_record = dir.path().join(SUPPLIER_SWITCH_FILE);
    save_materials(&data_file, &store()).expect("store written");
    let validator = IntegrityValidator::new(PolicyConfig::default()).expect("validator built");
    let trail = AuditTrail {
        data_file: &data_file,
        email_record: &email_record,
    };

    let (violations, warnings) = validator.validate_audit_trail(trail).expect("trail checked");
    assert_eq!(violations.len(), 1);
    assert!(warnings.is_empty());

    fs::write(&email_record, "switch").expect("email written");
    let (violations, _) = validator.validate_audit_trail(trail).expect("trail checked");
    assert!(violations.is_empty());
}

#[test]
fn stress_checks_pass_on_sound_data() {
    let report = StressTester::new(PolicyConfig::default())
        .generate_report(&store(), &mut seeded_rng(Some(5)))
        .expect("report built");

    assert_eq!(report.scored_probes().count(), 7);
    assert_eq!(report.count_status(TestStatus::Passed), 6);
    assert_eq!(report.count_status(TestStatus::Warning), 1);
    assert!((report.resilience_percentage - 600.0 / 7.0).abs() < 1e-9);
    assert_eq!(report.memory_usage_test.dataset_size, 300);
    assert_eq!(report.failure_scenarios.len(), 2);
}

#[test]
fn negative_stock_is_flagged_by_the_business_rules() {
    let materials = store();
    let results = StressTester::new(PolicyConfig::default())
        .extreme_values(&materials[0], &materials[1])
        .expect("extreme values checked");

    let negative = results
        .iter()
        .find(|result| result.test == "negative_inventory")
        .expect("negative inventory result");
    assert_eq!(negative.status, TestStatus::Warning);
    assert_eq!(negative.note.as_deref(), Some("Negative inventory detected"));
}

#[test]
fn memory_grows_with_the_reorder_batch() {
    let tester = StressTester::new(PolicyConfig::default());

    let stocked = tester.memory_usage(&store());
    assert_eq!(stocked.low_stock_processed, 0);
    assert_eq!(stocked.initial_memory, stocked.final_memory);
    assert_eq!(stocked.status, TestStatus::Passed);

    let depleted: Vec<Material> = store()
        .into_iter()
        .map(|item| Material {
            days_on_hand: 2,
            ..item
        })
        .collect();
    let usage = tester.memory_usage(&depleted);
    assert_eq!(usage.low_stock_processed, 300);
    assert_eq!(usage.final_memory, usage.initial_memory * 2);
    assert_eq!(usage.status, TestStatus::Warning);
}

#[test]
fn stress_needs_two_materials() {
    let error = StressTester::new(PolicyConfig::default())
        .generate_report(&store()[..1], &mut seeded_rng(Some(5)))
        .expect_err("too few materials");
    assert!(matches!(
        error,
        ToolError::InsufficientData {
            required: 2,
            found: 1
        }
    ));
}

#[test]
fn master_audit_combines_the_three_scores() {
    let dir = tempdir().expect("temporary directory");
    let data_file = dir.path().join("raw_materials.json");
    let email_record = dir.path().join(SUPPLIER_SWITCH_FILE);
    let materials = store();
    save_materials(&data_file, &materials).expect("store written");

    let report = MasterAuditor::new(&PolicyConfig::default())
        .expect("auditor built")
        .run_comprehensive_audit(
            &materials,
            &raw(&materials),
            AuditTrail {
                data_file: &data_file,
                email_record: &email_record,
            },
            &mut seeded_rng(Some(9)),
        )
        .expect("audit ran");

    assert_eq!(report.component_scores.resilience, 100.0);
    assert_eq!(report.component_scores.compliance, 90.0);
    assert_eq!(report.overall_health_score, 91.9);
    assert_eq!(report.risk_level, RiskLevel::Low);
    assert!(report.critical_findings.is_empty());
    assert_eq!(report.audit_summary.compliance_violations, 1);
    assert!(render_executive_summary(&report).contains("Risk Level: LOW"));
}

#[test]
fn risk_levels_follow_score_bands() {
    assert_eq!(RiskLevel::from_score(90.0), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(89.9), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(70.0), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(69.9), RiskLevel::High);
}

#[test]
fn workflow_audit_persists_every_report() {
    let dir = tempdir().expect("temporary directory");
    let config = config_in(dir.path());
    save_materials(&config.paths.data_file, &store()).expect("store written");

    let report = workflow::run_audit(&config, &mut seeded_rng(Some(1))).expect("audit ran");

    for name in [
        workflow::RESILIENCE_REPORT_FILE,
        COMPLIANCE_REPORT_FILE,
        workflow::STRESS_REPORT_FILE,
        MASTER_REPORT_FILE,
        "audit_report.html",
        "audit_dashboard.svg",
    ] {
        assert!(dir.path().join(name).exists(), "{name} missing");
    }
    let saved: Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join(MASTER_REPORT_FILE)).expect("master report read"),
    )
    .expect("master report parsed");
    assert_eq!(saved["risk_level"], json!(report.risk_level.to_string()));
    assert_eq!(saved["audit_id"], json!(report.audit_id.to_string()));
}
