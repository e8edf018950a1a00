//! Apples-to-apples comparison of offers for the same chemical.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::procurement::desk::compliance::check_compliance_completeness;
use crate::procurement::desk::model::{DOCUMENT_COUNT, Material};

/// One supplier offer inside a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierOption {
    pub sku: String,
    pub supplier_name: String,
    pub price: f64,
    pub compliance_score: usize,
    pub status: String,
    pub lead_time: i64,
}

impl SupplierOption {
    fn from_material(material: &Material) -> Self {
        let check = check_compliance_completeness(&material.compliance_package);
        Self {
            sku: material.sku.clone(),
            supplier_name: material.supplier_name.clone(),
            price: material.price,
            compliance_score: check.score(),
            status: check.status.to_string(),
            lead_time: material.lead_time,
        }
    }
}

/// Extra cost and extra documents of the most compliant offer over the
/// cheapest one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeOff {
    pub extra_cost: f64,
    pub extra_documents: usize,
}

/// Offers for one CAS number with more than one supplier option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CasComparison {
    pub cas_number: String,
    pub inci_name: String,
    /// Sorted by ascending price.
    pub options: Vec<SupplierOption>,
    pub cheapest: SupplierOption,
    pub most_compliant: SupplierOption,
    pub trade_off: Option<TradeOff>,
}

/// Aggregate figures over all comparisons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub average_price_spread: Option<f64>,
    pub average_compliance_spread: Option<f64>,
    pub total_options: usize,
    pub materials_with_choices: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub comparisons: Vec<CasComparison>,
    pub summary: ComparisonSummary,
}

/// Groups materials by CAS number.
pub fn group_by_cas(materials: &[Material]) -> BTreeMap<&str, Vec<&Material>> {
    let mut groups: BTreeMap<&str, Vec<&Material>> = BTreeMap::new();
    for material in materials {
        groups
            .entry(material.cas_number.as_str())
            .or_default()
            .push(material);
    }
    groups
}

/// Compares price against compliance for every chemical sold by more than one
/// supplier.
pub fn compare_suppliers(materials: &[Material]) -> ComparisonReport {
    let comparisons: Vec<CasComparison> = group_by_cas(materials)
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .filter_map(|(cas_number, group)| compare_group(cas_number, &group))
        .collect();

    let total_options = comparisons.iter().map(|c| c.options.len()).sum();
    let price_spreads: Vec<f64> = comparisons
        .iter()
        .map(|c| spread(c.options.iter().map(|o| o.price)))
        .collect();
    let compliance_spreads: Vec<f64> = comparisons
        .iter()
        .map(|c| spread(c.options.iter().map(|o| o.compliance_score as f64)))
        .collect();

    ComparisonReport {
        summary: ComparisonSummary {
            average_price_spread: mean(&price_spreads),
            average_compliance_spread: mean(&compliance_spreads),
            total_options,
            materials_with_choices: comparisons.len(),
        },
        comparisons,
    }
}

fn compare_group(cas_number: &str, group: &[&Material]) -> Option<CasComparison> {
    let first = group.first()?;
    let mut options: Vec<SupplierOption> = group
        .iter()
        .map(|material| SupplierOption::from_material(material))
        .collect();
    options.sort_by(|lhs, rhs| lhs.price.total_cmp(&rhs.price));

    let cheapest = options
        .iter()
        .min_by(|lhs, rhs| {
            lhs.price
                .total_cmp(&rhs.price)
                .then_with(|| rhs.compliance_score.cmp(&lhs.compliance_score))
        })?
        .clone();
    // first maximum wins, so ties resolve to the cheaper offer
    let mut most_compliant = options.first()?;
    for option in &options {
        if option.compliance_score > most_compliant.compliance_score {
            most_compliant = option;
        }
    }
    let most_compliant = most_compliant.clone();

    let trade_off = (cheapest != most_compliant).then(|| TradeOff {
        extra_cost: most_compliant.price - cheapest.price,
        extra_documents: most_compliant
            .compliance_score
            .saturating_sub(cheapest.compliance_score),
    });

    Some(CasComparison {
        cas_number: cas_number.to_string(),
        inci_name: first.inci_name.clone(),
        options,
        cheapest,
        most_compliant,
        trade_off,
    })
}

fn spread(values: impl Iterator<Item = f64>) -> f64 {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
        (min.min(value), max.max(value))
    });
    if min.is_finite() { max - min } else { 0.0 }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Renders the comparison as console tables.
pub fn render_comparison(report: &ComparisonReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Apples-to-Apples Validation Report");
    let _ = writeln!(out, "Comparing Price vs Compliance for Identical Materials");
    let _ = writeln!(out, "{}", "=".repeat(60));

    if report.comparisons.is_empty() {
        let _ = writeln!(
            out,
            "No materials found with multiple suppliers for the same CAS number"
        );
        return out;
    }

    let _ = writeln!(
        out,
        "Found {} materials with multiple supplier options:",
        report.comparisons.len()
    );

    for comparison in &report.comparisons {
        let _ = writeln!(out);
        let _ = writeln!(out, "CAS Number: {}", comparison.cas_number);
        let _ = writeln!(out, "Material: {}", comparison.inci_name);
        let _ = writeln!(out, "{}", "=".repeat(80));
        let _ = writeln!(
            out,
            "{:<25} {:<10} {:<12} {:<15} {:<10}",
            "Supplier", "Price", "Compliance", "Status", "Lead Time"
        );
        let _ = writeln!(out, "{}", "-".repeat(80));
        for option in &comparison.options {
            let _ = writeln!(
                out,
                "{:<25} ${:<9.2} {:<12} {:<15} {} days",
                option.supplier_name,
                option.price,
                format!("{}/{}", option.compliance_score, DOCUMENT_COUNT),
                option.status,
                option.lead_time
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Analysis:");
        let _ = writeln!(
            out,
            "   Cheapest: {} (${:.2}) - {}/{} docs",
            comparison.cheapest.supplier_name,
            comparison.cheapest.price,
            comparison.cheapest.compliance_score,
            DOCUMENT_COUNT
        );
        let _ = writeln!(
            out,
            "   Most Compliant: {} ({}/{} docs) - ${:.2}",
            comparison.most_compliant.supplier_name,
            comparison.most_compliant.compliance_score,
            DOCUMENT_COUNT,
            comparison.most_compliant.price
        );
        if let Some(trade_off) = &comparison.trade_off {
            let _ = writeln!(
                out,
                "   Trade-off: Pay ${:.2} more for {} additional docs",
                trade_off.extra_cost, trade_off.extra_documents
            );
        }
    }

    let summary = &report.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "SUMMARY STATISTICS");
    let _ = writeln!(out, "{}", "=".repeat(60));
    if let (Some(price), Some(compliance)) =
        (summary.average_price_spread, summary.average_compliance_spread)
    {
        let _ = writeln!(out, "Average price variance: ${price:.2}");
        let _ = writeln!(out, "Average compliance variance: {compliance:.1} documents");
    }
    let _ = writeln!(out, "Total supplier options analyzed: {}", summary.total_options);
    let _ = writeln!(
        out,
        "Unique materials with choices: {}",
        summary.materials_with_choices
    );
    out
}
