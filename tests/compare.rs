mod common;

use common::{aluminium, material, steel, with_missing};
use procurement_desk::compare::{compare_suppliers, group_by_cas, render_comparison};
use procurement_desk::model::{ComplianceDocument, Material};

fn offer(sku: &str, cas: &str, supplier: &str, price: f64) -> Material {
    Material {
        cas_number: cas.to_string(),
        ..material(sku, supplier, price, aluminium())
    }
}

#[test]
fn only_chemicals_with_several_suppliers_are_compared() {
    let materials = vec![
        offer("SKU-0001-aaa", "56-81-5", "Acme Corp", 120.0),
        offer("SKU-0002-aaa", "98-92-0", "Acme Corp", 80.0),
        offer("SKU-0003-aaa", "56-81-5", "Global Labs", 90.0),
    ];

    let groups = group_by_cas(&materials);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups["56-81-5"].len(), 2);

    let report = compare_suppliers(&materials);
    assert_eq!(report.comparisons.len(), 1);
    assert_eq!(report.summary.materials_with_choices, 1);
    assert_eq!(report.summary.total_options, 2);
    let prices: Vec<f64> = report.comparisons[0].options.iter().map(|o| o.price).collect();
    assert_eq!(prices, vec![90.0, 120.0]);
}

#[test]
fn trade_off_prices_the_extra_documents() {
    let cheap = with_missing(
        offer("SKU-0001-aaa", "56-81-5", "Budget Chem", 50.0),
        &[
            ComplianceDocument::HalalCertificate,
            ComplianceDocument::KosherCertificate,
        ],
    );
    let thorough = offer("SKU-0002-aaa", "56-81-5", "Premium Labs", 80.0);

    let report = compare_suppliers(&[thorough, cheap]);
    let comparison = &report.comparisons[0];
    assert_eq!(comparison.cheapest.sku, "SKU-0001-aaa");
    assert_eq!(comparison.most_compliant.sku, "SKU-0002-aaa");
    let trade_off = comparison.trade_off.as_ref().expect("trade-off present");
    assert!((trade_off.extra_cost - 30.0).abs() < 1e-9);
    assert_eq!(trade_off.extra_documents, 2);
    assert_eq!(report.summary.average_price_spread, Some(30.0));
    assert_eq!(report.summary.average_compliance_spread, Some(2.0));
}

#[test]
fn equal_price_prefers_the_more_compliant_offer() {
    let weaker = with_missing(
        offer("SKU-0001-aaa", "56-81-5", "Acme Corp", 60.0),
        &[ComplianceDocument::GmoStatement],
    );
    let stronger = offer("SKU-0002-aaa", "56-81-5", "Global Labs", 60.0);

    let report = compare_suppliers(&[weaker, stronger]);
    let comparison = &report.comparisons[0];
    assert_eq!(comparison.cheapest.sku, "SKU-0002-aaa");
    assert_eq!(comparison.most_compliant.sku, "SKU-0002-aaa");
    assert!(comparison.trade_off.is_none());
}

#[test]
fn specs_do_not_affect_grouping() {
    let materials = vec![
        offer("SKU-0001-aaa", "56-81-5", "Acme Corp", 10.0),
        Material {
            technical_specs: steel(),
            ..offer("SKU-0002-aaa", "56-81-5", "Global Labs", 20.0)
        },
    ];

    assert_eq!(compare_suppliers(&materials).comparisons.len(), 1);
}

#[test]
fn empty_comparison_has_no_averages() {
    let materials = vec![offer("SKU-0001-aaa", "56-81-5", "Acme Corp", 10.0)];

    let report = compare_suppliers(&materials);
    assert!(report.comparisons.is_empty());
    assert_eq!(report.summary.average_price_spread, None);
    assert!(render_comparison(&report).contains("No materials found with multiple suppliers"));
}

#[test]
fn rendered_table_lists_every_option() {
    let materials = vec![
        offer("SKU-0001-aaa", "56-81-5", "Acme Corp", 120.0),
        offer("SKU-0003-aaa", "56-81-5", "Global Labs", 90.0),
    ];

    let text = render_comparison(&compare_suppliers(&materials));
    assert!(text.contains("CAS Number: 56-81-5"));
    assert!(text.contains("Acme Corp"));
    assert!(text.contains("Global Labs"));
    assert!(text.contains("Cheapest: Global Labs ($90.00)"));
}
