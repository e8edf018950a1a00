mod common;

use std::fs;

use common::{ScriptedModel, aluminium, config_in, material, steel};
use procurement_desk::ToolError;
use procurement_desk::io::materials::{load_materials, save_materials};
use procurement_desk::model::Material;
use procurement_desk::substitution::{
    FORCED_LOW_STOCK_DAYS, SUPPLIER_SWITCH_FILE, find_low_stock_with_substitute, force_low_stock,
    propose_substitution,
};
use tempfile::tempdir;

fn switch_store() -> Vec<Material> {
    vec![
        material("SKU-0001-aaa", "Acme Corp", 300.0, steel()),
        material("SKU-5895-agS", "Acme Corp", 422.22, aluminium()),
        material("SKU-1066-ZeP", "Global Labs", 116.85, aluminium()),
    ]
}

#[test]
fn no_low_stock_means_no_candidate() {
    let config = config_in(tempdir().expect("temporary directory").path());
    assert!(find_low_stock_with_substitute(&switch_store(), &config.policy).is_none());
}

#[test]
fn forced_low_stock_finds_the_other_supplier() {
    let config = config_in(tempdir().expect("temporary directory").path());
    let mut materials = switch_store();
    force_low_stock(&mut materials, "SKU-5895-agS").expect("SKU exists");

    assert_eq!(materials[1].days_on_hand, FORCED_LOW_STOCK_DAYS);
    let (current, substitute) =
        find_low_stock_with_substitute(&materials, &config.policy).expect("candidate found");
    assert_eq!(current.sku, "SKU-5895-agS");
    assert_eq!(substitute.sku, "SKU-1066-ZeP");
}

#[test]
fn forcing_an_unknown_sku_fails() {
    let mut materials = switch_store();
    let error = force_low_stock(&mut materials, "SKU-9999-zzz").expect_err("unknown SKU");
    assert!(matches!(error, ToolError::UnknownSku(sku) if sku == "SKU-9999-zzz"));
}

#[test]
fn low_stock_without_substitute_is_skipped() {
    let config = config_in(tempdir().expect("temporary directory").path());
    let mut materials = switch_store();
    materials[0].days_on_hand = 2;

    assert!(find_low_stock_with_substitute(&materials, &config.policy).is_none());
}

#[test]
fn substitution_saves_the_email_without_touching_the_store() {
    let dir = tempdir().expect("temporary directory");
    let config = config_in(dir.path());
    save_materials(&config.paths.data_file, &switch_store()).expect("store written");

    let model = ScriptedModel("Switch suppliers");
    let proposal = propose_substitution(&config, &model, Some("SKU-5895-agS"))
        .expect("proposal ran")
        .expect("candidate found");

    assert_eq!(proposal.substitute.supplier_name, "Global Labs");
    let email = fs::read_to_string(dir.path().join(SUPPLIER_SWITCH_FILE)).expect("email saved");
    assert_eq!(email, "Switch suppliers");
    let stored = load_materials(&config.paths.data_file).expect("store read");
    assert_eq!(stored, switch_store());
}
