mod common;

use std::fs;

use common::{FailingModel, ScriptedModel, aluminium, config_in, material, with_missing};
use procurement_desk::io::materials::{load_materials, save_materials};
use procurement_desk::model::ComplianceDocument;
use procurement_desk::portal::{
    DraftOutcome, SAMPLE_REQUEST_FILE, portal_session, render_portal, simulate_portal,
};
use tempfile::tempdir;

#[test]
fn upload_fills_the_first_missing_document_of_the_first_incomplete_material() {
    let mut materials = vec![
        material("SKU-0001-aaa", "Acme Corp", 10.0, aluminium()),
        with_missing(
            material("SKU-0002-aaa", "Global Labs", 20.0, aluminium()),
            &[
                ComplianceDocument::ReachDeclaration,
                ComplianceDocument::HalalCertificate,
            ],
        ),
    ];

    let run = simulate_portal(&mut materials, &ScriptedModel("unused"));
    let upload = run.upload.expect("upload happened");
    assert_eq!(upload.sku, "SKU-0002-aaa");
    assert_eq!(upload.document, ComplianceDocument::ReachDeclaration);
    assert_eq!(upload.after.missing, vec![ComplianceDocument::HalalCertificate]);
    assert!(run.sample_request.is_none());
    assert!(
        materials[1]
            .compliance_package
            .is_submitted(ComplianceDocument::ReachDeclaration)
    );
}

#[test]
fn completing_a_package_drafts_a_sample_request() {
    let mut materials = vec![with_missing(
        material("SKU-0001-aaa", "Acme Corp", 10.0, aluminium()),
        &[ComplianceDocument::KosherCertificate],
    )];

    let run = simulate_portal(&mut materials, &ScriptedModel("Dear supplier"));
    assert!(run.upload.expect("upload happened").after.is_ready());
    let request = run.sample_request.expect("sample requested");
    assert_eq!(request.draft, DraftOutcome::Drafted("Dear supplier".to_string()));
    assert_eq!(request.cas_number, "56-81-5");
}

#[test]
fn fully_compliant_store_requests_a_sample_for_the_first_material() {
    let mut materials = vec![
        material("SKU-0001-aaa", "Acme Corp", 10.0, aluminium()),
        material("SKU-0002-aaa", "Global Labs", 20.0, aluminium()),
    ];

    let run = simulate_portal(&mut materials, &ScriptedModel("Dear supplier"));
    assert!(run.upload.is_none());
    assert_eq!(run.sample_request.expect("sample requested").sku, "SKU-0001-aaa");
    assert!(render_portal(&simulate_portal(&mut materials, &ScriptedModel("x")))
        .contains("All materials are fully compliant!"));
}

#[test]
fn drafting_failures_are_recorded_not_raised() {
    let mut materials = vec![with_missing(
        material("SKU-0001-aaa", "Acme Corp", 10.0, aluminium()),
        &[ComplianceDocument::GmoStatement],
    )];

    let run = simulate_portal(&mut materials, &FailingModel);
    let request = run.sample_request.as_ref().expect("sample requested");
    assert!(matches!(request.draft, DraftOutcome::Failed(_)));
    assert!(render_portal(&run).contains("Error generating email"));
}

#[test]
fn portal_session_persists_the_upload_and_saves_the_email() {
    let dir = tempdir().expect("temporary directory");
    let config = config_in(dir.path());
    let materials = vec![with_missing(
        material("SKU-0001-aaa", "Acme Corp", 10.0, aluminium()),
        &[ComplianceDocument::AllergenStatement],
    )];
    save_materials(&config.paths.data_file, &materials).expect("store written");

    portal_session(&config.paths, &ScriptedModel("Please send 100g")).expect("session ran");

    let stored = load_materials(&config.paths.data_file).expect("store read");
    assert_eq!(stored[0].compliance_score(), 11);
    let email = fs::read_to_string(dir.path().join(SAMPLE_REQUEST_FILE)).expect("email saved");
    assert_eq!(email, "Please send 100g");
}
