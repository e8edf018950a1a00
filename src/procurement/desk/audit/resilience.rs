use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::procurement::desk::audit::timestamp_now;
use crate::procurement::desk::config::PolicyConfig;
use crate::procurement::desk::decision::{Decision, evaluate_purchase};
use crate::procurement::desk::error::Result;
use crate::procurement::desk::model::Material;

/// Penalty applied to the resilience score per recorded violation.
const VIOLATION_PENALTY: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecMatching {
    pub accuracy: f64,
    pub total_tests: usize,
    pub correct: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceThresholdViolation {
    pub sku: String,
    pub price: f64,
    pub expected: Decision,
    pub actual: Decision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub total_items: usize,
    pub low_stock_count: usize,
    pub critical_stock_count: usize,
    pub low_stock_percentage: f64,
    pub critical_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstituteAnalysis {
    pub substitutes_found: usize,
    pub items_without_substitutes: Vec<String>,
    pub substitute_coverage: f64,
}

/// A pair where the decision disagreed with spec equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecMismatchViolation {
    pub item1: String,
    pub item2: String,
    pub expected_match: bool,
    pub decision: Decision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResilienceReport {
    pub timestamp: String,
    pub spec_matching: SpecMatching,
    pub price_compliance: Vec<PriceThresholdViolation>,
    pub stock_analysis: StockAnalysis,
    pub substitute_analysis: SubstituteAnalysis,
    pub compliance_violations: Vec<SpecMismatchViolation>,
    pub resilience_score: f64,
}

/// Checks that the decision function agrees with the data: pairwise spec
/// matching, price thresholds, stock levels and substitute coverage.
#[derive(Debug, Clone)]
pub struct ResilienceAuditor {
    policy: PolicyConfig,
}

impl ResilienceAuditor {
    pub fn new(policy: PolicyConfig) -> Self {
        Self { policy }
    }

    /// Evaluates every unordered pair and compares the verdict with spec
    /// equality.
    pub fn spec_matching_accuracy(
        &self,
        materials: &[Material],
    ) -> (SpecMatching, Vec<SpecMismatchViolation>) {
        let mut correct = 0;
        let mut total_tests = 0;
        let mut violations = Vec::new();

        for (i, item1) in materials.iter().enumerate() {
            for item2 in &materials[i + 1..] {
                total_tests += 1;
                let specs_match = item1.technical_specs == item2.technical_specs;
                let decision = evaluate_purchase(item1, item2, self.policy.price_threshold);
                if specs_match != decision.is_rejected() {
                    correct += 1;
                } else {
                    violations.push(SpecMismatchViolation {
                        item1: item1.sku.clone(),
                        item2: item2.sku.clone(),
                        expected_match: specs_match,
                        decision,
                    });
                }
            }
        }

        let accuracy = if total_tests > 0 {
            correct as f64 / total_tests as f64
        } else {
            0.0
        };
        (
            SpecMatching {
                accuracy,
                total_tests,
                correct,
            },
            violations,
        )
    }

    /// Evaluates each item against a same-spec copy of itself and checks the
    /// verdict follows the price threshold.
    pub fn price_threshold_compliance(&self, materials: &[Material]) -> Vec<PriceThresholdViolation> {
        materials
            .iter()
            .filter_map(|item| {
                let probe = Material {
                    sku: "TEST-001".to_string(),
                    ..item.clone()
                };
                let actual = evaluate_purchase(&probe, item, self.policy.price_threshold);
                let expected = if item.price < self.policy.price_threshold {
                    Decision::Approved
                } else {
                    Decision::PendingManager
                };
                (actual != expected && !actual.is_rejected()).then(|| PriceThresholdViolation {
                    sku: item.sku.clone(),
                    price: item.price,
                    expected,
                    actual,
                })
            })
            .collect()
    }

    pub fn low_stock_detection(&self, materials: &[Material]) -> StockAnalysis {
        let low_stock_count = materials
            .iter()
            .filter(|item| item.days_on_hand < self.policy.low_stock_days)
            .count();
        let critical_items: Vec<String> = materials
            .iter()
            .filter(|item| item.days_on_hand <= self.policy.critical_stock_days)
            .map(|item| item.sku.clone())
            .collect();
        let low_stock_percentage = if materials.is_empty() {
            0.0
        } else {
            low_stock_count as f64 / materials.len() as f64 * 100.0
        };

        StockAnalysis {
            total_items: materials.len(),
            low_stock_count,
            critical_stock_count: critical_items.len(),
            low_stock_percentage,
            critical_items,
        }
    }

    /// Share of low-stock items that have a substitute; 100 when nothing is
    /// low on stock.
    pub fn substitute_availability(&self, materials: &[Material]) -> SubstituteAnalysis {
        let mut substitutes_found = 0;
        let mut items_without_substitutes = Vec::new();
        let mut low_stock = 0;

        for item in materials
            .iter()
            .filter(|item| item.days_on_hand < self.policy.low_stock_days)
        {
            low_stock += 1;
            if materials.iter().any(|other| item.is_substitute(other)) {
                substitutes_found += 1;
            } else {
                items_without_substitutes.push(item.sku.clone());
            }
        }

        let substitute_coverage = if low_stock > 0 {
            substitutes_found as f64 / low_stock as f64 * 100.0
        } else {
            100.0
        };
        SubstituteAnalysis {
            substitutes_found,
            items_without_substitutes,
            substitute_coverage,
        }
    }

    #[instrument(level = "info", skip_all, fields(count = materials.len()))]
    pub fn generate_report(&self, materials: &[Material]) -> Result<ResilienceReport> {
        let (spec_matching, compliance_violations) = self.spec_matching_accuracy(materials);
        let price_compliance = self.price_threshold_compliance(materials);
        let stock_analysis = self.low_stock_detection(materials);
        let substitute_analysis = self.substitute_availability(materials);

        let spec_score = spec_matching.accuracy * 100.0;
        let penalty = compliance_violations.len() as f64 * VIOLATION_PENALTY;
        let resilience_score =
            ((spec_score + substitute_analysis.substitute_coverage) / 2.0 - penalty).max(0.0);
        debug!(resilience_score, "resilience audit complete");

        Ok(ResilienceReport {
            timestamp: timestamp_now()?,
            spec_matching,
            price_compliance,
            stock_analysis,
            substitute_analysis,
            compliance_violations,
            resilience_score,
        })
    }
}
