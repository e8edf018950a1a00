use std::collections::BTreeMap;

use procurement_desk::config::GeneratorConfig;
use procurement_desk::generate::{CATALOG, common_specs, generate_materials, seeded_rng};
use procurement_desk::model::DOCUMENT_COUNT;
use regex::Regex;

fn config() -> GeneratorConfig {
    GeneratorConfig {
        seed: Some(7),
        ..GeneratorConfig::default()
    }
}

#[test]
fn generates_regular_items_plus_interchangeable_pairs() {
    let config = config();
    let materials = generate_materials(&config, &mut seeded_rng(config.seed));

    assert_eq!(
        materials.len(),
        config.regular_items + 2 * config.interchangeable_pairs
    );
}

#[test]
fn same_seed_gives_the_same_store() {
    let config = config();
    let first = generate_materials(&config, &mut seeded_rng(Some(42)));
    let second = generate_materials(&config, &mut seeded_rng(Some(42)));

    assert_eq!(first, second);
}

#[test]
fn records_respect_generator_ranges() {
    let config = config();
    let sku = Regex::new(r"^SKU-\d{4}-[A-Za-z]{3}$").expect("valid pattern");
    let grade = Regex::new(r"^[A-Z]{2}\d{2}$").expect("valid pattern");
    let shared = common_specs();

    for material in generate_materials(&config, &mut seeded_rng(Some(3))) {
        assert!(sku.is_match(&material.sku), "bad SKU {}", material.sku);
        assert!((10.0..=500.0).contains(&material.price));
        assert!((5..=60).contains(&material.lead_time));
        assert!((1..=30).contains(&material.days_on_hand));
        assert!(material.compliance_score() <= DOCUMENT_COUNT);
        assert!(
            CATALOG
                .iter()
                .any(|(cas, inci)| *cas == material.cas_number && *inci == material.inci_name)
        );

        if !shared.contains(&material.technical_specs) {
            let specs = &material.technical_specs;
            let density = specs.density.expect("density set");
            assert!((0.5..=10.0).contains(&density));
            assert!((50..=800).contains(&specs.tensile_strength.expect("strength set")));
            assert!(grade.is_match(specs.grade.as_deref().expect("grade set")));
        }
    }
}

#[test]
fn interchangeable_pairs_share_cas_and_specs_across_suppliers() {
    let config = GeneratorConfig {
        regular_items: 0,
        ..config()
    };
    let materials = generate_materials(&config, &mut seeded_rng(Some(11)));

    let mut by_grade: BTreeMap<String, Vec<_>> = BTreeMap::new();
    for material in &materials {
        let grade = material.technical_specs.grade.clone().expect("grade set");
        by_grade.entry(grade).or_default().push(material);
    }
    assert_eq!(by_grade.len(), 3);
    for pair in by_grade.values() {
        assert_eq!(pair.len(), 2);
        assert_eq!(pair[0].cas_number, pair[1].cas_number);
        assert!(pair[0].is_substitute(pair[1]));
    }
}

#[test]
fn submission_rate_bounds_produce_uniform_packages() {
    let all = GeneratorConfig {
        document_submission_rate: 1.0,
        ..config()
    };
    let none = GeneratorConfig {
        document_submission_rate: 0.0,
        ..config()
    };

    assert!(
        generate_materials(&all, &mut seeded_rng(Some(1)))
            .iter()
            .all(|material| material.compliance_score() == DOCUMENT_COUNT)
    );
    assert!(
        generate_materials(&none, &mut seeded_rng(Some(1)))
            .iter()
            .all(|material| material.compliance_score() == 0)
    );
}
