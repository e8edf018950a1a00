mod common;

use common::{aluminium, material, steel};
use procurement_desk::compliance::{ComplianceStatus, check_compliance_completeness};
use procurement_desk::decision::{Decision, evaluate_purchase};
use procurement_desk::model::{ComplianceDocument, CompliancePackage, DOCUMENT_COUNT, TechnicalSpecs};

const THRESHOLD: f64 = 1000.0;

#[test]
fn matching_specs_below_threshold_are_approved() {
    let proposed = material("SKU-5895-agS", "Acme Corp", 422.22, aluminium());
    let current = material("SKU-1066-ZeP", "Global Labs", 116.85, aluminium());

    assert_eq!(evaluate_purchase(&proposed, &current, THRESHOLD), Decision::Approved);
}

#[test]
fn differing_specs_are_rejected_regardless_of_price() {
    let proposed = material("SKU-0001-abc", "Acme Corp", 10.0, aluminium());
    let current = material("SKU-0002-abc", "Acme Corp", 10.0, steel());

    let decision = evaluate_purchase(&proposed, &current, THRESHOLD);
    assert_eq!(decision, Decision::RejectedSpecsMismatch);
    assert_eq!(decision.to_string(), "REJECTED: Specs Mismatch");
}

#[test]
fn threshold_price_goes_to_a_manager() {
    let current = material("SKU-1066-ZeP", "Global Labs", 116.85, aluminium());
    let at_threshold = material("SKU-TEST-001", "Acme Corp", THRESHOLD, aluminium());
    let above = material("SKU-TEST-002", "Acme Corp", 1500.0, aluminium());

    assert_eq!(
        evaluate_purchase(&at_threshold, &current, THRESHOLD),
        Decision::PendingManager
    );
    assert_eq!(evaluate_purchase(&above, &current, THRESHOLD), Decision::PendingManager);
}

#[test]
fn specs_compare_every_field_exactly() {
    let proposed = material("SKU-0001-abc", "Acme Corp", 10.0, TechnicalSpecs::new(2.7, 310, "6061-T6"));
    let slightly_denser = material("SKU-0002-abc", "Acme Corp", 10.0, TechnicalSpecs::new(2.71, 310, "6061-T6"));
    let no_grade = material(
        "SKU-0003-abc",
        "Acme Corp",
        10.0,
        TechnicalSpecs {
            grade: None,
            ..TechnicalSpecs::new(2.7, 310, "6061-T6")
        },
    );

    assert!(evaluate_purchase(&proposed, &slightly_denser, THRESHOLD).is_rejected());
    assert!(evaluate_purchase(&proposed, &no_grade, THRESHOLD).is_rejected());
}

#[test]
fn decisions_serialise_with_their_display_text() {
    let json = serde_json::to_string(&Decision::PendingManager).expect("serialised");
    assert_eq!(json, "\"PENDING MANAGER\"");
}

#[test]
fn complete_package_is_ready_for_rnd() {
    let check = check_compliance_completeness(&CompliancePackage::uniform(true));

    assert_eq!(check.status, ComplianceStatus::ReadyForRnd);
    assert!(check.missing.is_empty());
    assert_eq!(check.score(), DOCUMENT_COUNT);
}

#[test]
fn missing_documents_are_listed_in_canonical_order() {
    let mut package = CompliancePackage::uniform(true);
    package.set(ComplianceDocument::KosherCertificate, false);
    package.set(ComplianceDocument::SafetyDataSheet, false);

    let check = check_compliance_completeness(&package);
    assert_eq!(check.status, ComplianceStatus::MissingDocs);
    assert_eq!(
        check.missing,
        vec![
            ComplianceDocument::SafetyDataSheet,
            ComplianceDocument::KosherCertificate
        ]
    );
    assert_eq!(check.score(), 9);
}

#[test]
fn absent_documents_count_as_missing() {
    let package: CompliancePackage =
        serde_json::from_value(serde_json::json!({ "certificate_of_analysis": true }))
            .expect("package parsed");

    let check = check_compliance_completeness(&package);
    assert_eq!(check.score(), 1);
    assert_eq!(check.missing.len(), DOCUMENT_COUNT - 1);
    assert_eq!(check.status.to_string(), "MISSING_DOCS");
}
