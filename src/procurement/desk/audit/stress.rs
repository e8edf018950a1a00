use std::mem;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::procurement::desk::audit::integrity::Violation;
use crate::procurement::desk::audit::{IntegrityValidator, TestStatus, timestamp_now};
use crate::procurement::desk::config::PolicyConfig;
use crate::procurement::desk::decision::{Decision, evaluate_purchase};
use crate::procurement::desk::error::{Result, ToolError};
use crate::procurement::desk::model::{Material, TechnicalSpecs};

/// Minimum store size the probes need (they pair the first two records).
pub const MIN_MATERIALS: usize = 2;
/// Price used for the extreme value probe.
pub const EXTREME_PRICE: f64 = 999_999_999.0;
/// Copies of the store used by the memory probe.
const MEMORY_MULTIPLIER: usize = 100;
/// Repeated evaluations in the consistency probe.
const CONSISTENCY_RUNS: usize = 5;
/// Records turned into unique grades for the no-substitute scenario.
const UNIQUE_SCENARIO_ITEMS: usize = 10;
/// Days on hand given to the negative inventory probe.
const NEGATIVE_DAYS_ON_HAND: i64 = -1;
/// Growth of the memory footprint tolerated while processing.
const MEMORY_GROWTH_LIMIT: f64 = 1.1;
/// Share of low-stock items above which a crisis is critical.
const CRITICAL_CRISIS_SHARE: f64 = 0.8;

/// Outcome of one probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub test: String,
    pub status: TestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Decision>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decisions: Vec<Decision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ProbeResult {
    fn new(test: &str, status: TestStatus) -> Self {
        Self {
            test: test.to_string(),
            status,
            decision: None,
            expected: None,
            decisions: Vec::new(),
            error: None,
            note: None,
        }
    }

    fn passed_if(test: &str, passed: bool) -> Self {
        Self::new(test, if passed { TestStatus::Passed } else { TestStatus::Failed })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub test: String,
    pub dataset_size: usize,
    pub initial_memory: usize,
    pub final_memory: usize,
    pub low_stock_processed: usize,
    pub status: TestStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scenario", rename_all = "snake_case")]
pub enum FailureScenario {
    SupplyChainCrisis {
        low_stock_items: usize,
        total_items: usize,
        crisis_level: String,
    },
    NoSubstitutesAvailable {
        items_without_substitutes: usize,
        risk_level: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestReport {
    pub timestamp: String,
    pub data_corruption_tests: Vec<ProbeResult>,
    pub extreme_value_tests: Vec<ProbeResult>,
    pub concurrent_decision_tests: Vec<ProbeResult>,
    pub memory_usage_test: MemoryUsage,
    pub edge_case_tests: Vec<ProbeResult>,
    pub failure_scenarios: Vec<FailureScenario>,
    pub resilience_percentage: f64,
}

impl StressTestReport {
    /// Probes that count towards the pass rate.
    pub fn scored_probes(&self) -> impl Iterator<Item = &ProbeResult> {
        self.data_corruption_tests
            .iter()
            .chain(&self.extreme_value_tests)
            .chain(&self.concurrent_decision_tests)
            .chain(&self.edge_case_tests)
    }

    pub fn count_status(&self, status: TestStatus) -> usize {
        self.scored_probes().filter(|probe| probe.status == status).count()
    }
}

/// Feeds corrupted, extreme and edge-case inputs through the record parser
/// and the decision function.
#[derive(Debug, Clone)]
pub struct StressTester {
    policy: PolicyConfig,
}

impl StressTester {
    pub fn new(policy: PolicyConfig) -> Self {
        Self { policy }
    }

    /// Corrupted records must be rejected before they reach a decision.
    pub fn data_corruption_resilience(&self, first: &Material) -> Result<Vec<ProbeResult>> {
        let base = serde_json::to_value(first)?;

        let mut missing_price = base.clone();
        if let Value::Object(fields) = &mut missing_price {
            fields.remove("Price");
        }
        let mut invalid_price = base;
        if let Value::Object(fields) = &mut invalid_price {
            fields.insert("Price".to_string(), Value::String("invalid".to_string()));
        }

        Ok([("missing_price", missing_price), ("invalid_price_type", invalid_price)]
            .into_iter()
            .map(|(test, record)| match Material::from_value(0, record) {
                Ok(_) => ProbeResult {
                    error: Some("Should have thrown error".to_string()),
                    ..ProbeResult::new(test, TestStatus::Failed)
                },
                Err(error) => ProbeResult {
                    note: Some(error.to_string()),
                    ..ProbeResult::new(test, TestStatus::Passed)
                },
            })
            .collect())
    }

    /// A huge price must never be auto-approved, and negative stock must be
    /// flagged by the business rules.
    pub fn extreme_values(&self, first: &Material, second: &Material) -> Result<Vec<ProbeResult>> {
        let extreme = Material {
            price: EXTREME_PRICE,
            ..first.clone()
        };
        let decision = evaluate_purchase(&extreme, second, self.policy.price_threshold);
        let expected = if extreme.technical_specs == second.technical_specs {
            Decision::PendingManager
        } else {
            Decision::RejectedSpecsMismatch
        };
        let high_price = ProbeResult {
            decision: Some(decision),
            expected: Some(expected),
            ..ProbeResult::passed_if("extreme_high_price", decision == expected)
        };

        let negative = Material {
            days_on_hand: NEGATIVE_DAYS_ON_HAND,
            ..first.clone()
        };
        let (violations, _) = IntegrityValidator::new(self.policy.clone())?
            .validate_business_rules(&[serde_json::to_value(&negative)?]);
        let flagged = violations
            .iter()
            .any(|violation| matches!(violation, Violation::NegativeInventory { .. }));
        let negative_inventory = if flagged {
            ProbeResult {
                note: Some("Negative inventory detected".to_string()),
                ..ProbeResult::new("negative_inventory", TestStatus::Warning)
            }
        } else {
            ProbeResult {
                error: Some("Negative inventory was not flagged".to_string()),
                ..ProbeResult::new("negative_inventory", TestStatus::Failed)
            }
        };
        Ok(vec![high_price, negative_inventory])
    }

    /// The same pair evaluated repeatedly must give one answer.
    pub fn decision_consistency(&self, first: &Material, second: &Material) -> Vec<ProbeResult> {
        let decisions: Vec<Decision> = (0..CONSISTENCY_RUNS)
            .map(|_| evaluate_purchase(first, second, self.policy.price_threshold))
            .collect();
        let consistent = decisions.windows(2).all(|pair| pair[0] == pair[1]);
        vec![ProbeResult {
            decisions,
            ..ProbeResult::passed_if("decision_consistency", consistent)
        }]
    }

    /// Multiplies the store, then gathers the low-stock items into a reorder
    /// batch. Memory is the deep footprint of what is held before and after.
    pub fn memory_usage(&self, materials: &[Material]) -> MemoryUsage {
        let large_dataset: Vec<Material> = materials
            .iter()
            .cycle()
            .take(materials.len() * MEMORY_MULTIPLIER)
            .cloned()
            .collect();
        let initial_memory = footprint(&large_dataset);
        let reorder_batch: Vec<Material> = large_dataset
            .iter()
            .filter(|item| item.days_on_hand < self.policy.low_stock_days)
            .cloned()
            .collect();
        let final_memory = initial_memory + footprint(&reorder_batch);

        MemoryUsage {
            test: "memory_usage".to_string(),
            dataset_size: large_dataset.len(),
            initial_memory,
            final_memory,
            low_stock_processed: reorder_batch.len(),
            status: if final_memory as f64 <= initial_memory as f64 * MEMORY_GROWTH_LIMIT {
                TestStatus::Passed
            } else {
                TestStatus::Warning
            },
        }
    }

    pub fn edge_cases(&self, first: &Material, second: &Material) -> Vec<ProbeResult> {
        let blank = Material {
            technical_specs: TechnicalSpecs::default(),
            ..first.clone()
        };
        let decision = evaluate_purchase(&blank, second, self.policy.price_threshold);
        let should_reject = !second.technical_specs.is_empty();
        let empty_specs = ProbeResult {
            decision: Some(decision),
            ..ProbeResult::passed_if("empty_tech_specs", decision.is_rejected() == should_reject)
        };

        let decision = evaluate_purchase(first, first, self.policy.price_threshold);
        let identical = ProbeResult {
            decision: Some(decision),
            ..ProbeResult::passed_if("identical_items", !decision.is_rejected())
        };
        vec![empty_specs, identical]
    }

    pub fn failure_scenarios<R: Rng + ?Sized>(
        &self,
        materials: &[Material],
        rng: &mut R,
    ) -> Vec<FailureScenario> {
        let mut crisis = materials.to_vec();
        for item in &mut crisis {
            item.days_on_hand = rng.gen_range(0..=2);
        }
        let low_stock_items = crisis
            .iter()
            .filter(|item| item.days_on_hand < self.policy.low_stock_days)
            .count();
        let crisis_level = if low_stock_items as f64 > materials.len() as f64 * CRITICAL_CRISIS_SHARE {
            "critical"
        } else {
            "moderate"
        };

        let unique: Vec<Material> = materials
            .iter()
            .take(UNIQUE_SCENARIO_ITEMS)
            .enumerate()
            .map(|(index, item)| {
                let mut item = item.clone();
                item.technical_specs.grade = Some(format!("UNIQUE_{index}"));
                item
            })
            .collect();
        let items_without_substitutes = unique
            .iter()
            .filter(|item| !unique.iter().any(|other| item.is_substitute(other)))
            .count();

        vec![
            FailureScenario::SupplyChainCrisis {
                low_stock_items,
                total_items: crisis.len(),
                crisis_level: crisis_level.to_string(),
            },
            FailureScenario::NoSubstitutesAvailable {
                items_without_substitutes,
                risk_level: "high".to_string(),
            },
        ]
    }

    #[instrument(level = "info", skip_all, fields(count = materials.len()))]
    pub fn generate_report<R: Rng + ?Sized>(
        &self,
        materials: &[Material],
        rng: &mut R,
    ) -> Result<StressTestReport> {
        let [first, second, ..] = materials else {
            return Err(ToolError::InsufficientData {
                required: MIN_MATERIALS,
                found: materials.len(),
            });
        };

        let mut report = StressTestReport {
            timestamp: timestamp_now()?,
            data_corruption_tests: self.data_corruption_resilience(first)?,
            extreme_value_tests: self.extreme_values(first, second)?,
            concurrent_decision_tests: self.decision_consistency(first, second),
            memory_usage_test: self.memory_usage(materials),
            edge_case_tests: self.edge_cases(first, second),
            failure_scenarios: self.failure_scenarios(materials, rng),
            resilience_percentage: 0.0,
        };

        let total = report.scored_probes().count();
        let passed = report.count_status(TestStatus::Passed);
        report.resilience_percentage = if total > 0 {
            passed as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        debug!(passed, total, "stress tests complete");
        Ok(report)
    }
}

/// Inline size plus owned string buffers.
fn footprint(items: &[Material]) -> usize {
    items
        .iter()
        .map(|item| {
            mem::size_of::<Material>()
                + item.sku.capacity()
                + item.cas_number.capacity()
                + item.inci_name.capacity()
                + item.supplier_name.capacity()
                + item.technical_specs.grade.as_ref().map_or(0, String::capacity)
        })
        .sum()
}
