use std::fs;

use procurement_desk::config::DeskConfig;
use procurement_desk::ToolError;
use tempfile::tempdir;

#[test]
fn empty_config_uses_defaults() {
    let config = DeskConfig::from_toml("").expect("parsed");

    assert_eq!(config.policy.price_threshold, 1000.0);
    assert_eq!(config.policy.low_stock_days, 5);
    assert_eq!(config.generator.regular_items, 44);
    assert_eq!(config.generator.interchangeable_pairs, 3);
    assert_eq!(config.paths.data_file.to_str(), Some("raw_materials.json"));
    assert_eq!(config.llm.api_key_env, "ANTHROPIC_API_KEY");
}

#[test]
fn sections_override_individual_keys() {
    let config = DeskConfig::from_toml(
        r#"
        [policy]
        price_threshold = 250.0

        [generator]
        seed = 9

        [llm]
        offline = true
        "#,
    )
    .expect("parsed");

    assert_eq!(config.policy.price_threshold, 250.0);
    assert_eq!(config.policy.critical_stock_days, 1);
    assert_eq!(config.generator.seed, Some(9));
    assert!(config.llm.offline);
}

#[test]
fn unknown_keys_are_rejected() {
    let error = DeskConfig::from_toml("[policy]\nprice_treshold = 5.0\n").expect_err("typo");
    assert!(matches!(error, ToolError::ConfigParse(_)));
}

#[test]
fn out_of_range_values_are_rejected() {
    for source in [
        "[policy]\nprice_threshold = 0.0\n",
        "[policy]\ncritical_stock_days = 5\n",
        "[generator]\ndocument_submission_rate = 1.5\n",
        "[llm]\nmodel = \"\"\n",
    ] {
        let error = DeskConfig::from_toml(source).expect_err("invalid value");
        assert!(matches!(error, ToolError::InvalidConfig(_)), "{source}");
    }
}

#[test]
fn explicit_config_path_must_exist() {
    let dir = tempdir().expect("temporary directory");
    let missing = dir.path().join("nope.toml");
    let error = DeskConfig::load(Some(&missing)).expect_err("missing file");
    assert!(matches!(error, ToolError::MissingInput(_)));

    let present = dir.path().join("desk.toml");
    fs::write(&present, "[paths]\noutput_dir = \"reports\"\n").expect("config written");
    let config = DeskConfig::load(Some(&present)).expect("loaded");
    assert_eq!(config.paths.output("dashboard.html").to_str(), Some("reports/dashboard.html"));
}
