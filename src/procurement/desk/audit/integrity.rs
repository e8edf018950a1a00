use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::procurement::desk::audit::timestamp_now;
use crate::procurement::desk::config::PolicyConfig;
use crate::procurement::desk::decision::{Decision, evaluate_terms};
use crate::procurement::desk::error::{Result, ToolError};
use crate::procurement::desk::model::TechnicalSpecs;

/// Fields every record has to carry.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "SKU",
    "cas_number",
    "inci_name",
    "SupplierName",
    "Price",
    "LeadTime",
    "DaysOnHand",
    "TechnicalSpecs",
    "compliance_package",
];

/// Keys expected inside `TechnicalSpecs`.
pub const SPEC_FIELDS: [&str; 3] = ["density", "tensile_strength", "grade"];

const SKU_PATTERN: &str = r"^SKU-\d{4}-[A-Za-z]{3}$";
const EXPECTED_SKU_FORMAT: &str = "SKU-####-XXX";
const UNKNOWN_SKU: &str = "UNKNOWN";
/// Records sampled for the decision consistency pass.
const DECISION_SAMPLE: usize = 10;
/// Neighbours each sampled record is evaluated against.
const DECISION_WINDOW: usize = 5;
const SECONDS_PER_DAY: u64 = 86_400;

/// A rule the data set breaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Violation {
    MissingRequiredField { sku: String, field: String },
    InvalidSkuFormat { sku: String, expected_format: String },
    InvalidPrice { sku: String, price: Value },
    MissingTechnicalSpec { sku: String, missing_spec: String },
    DuplicateSku { sku: String },
    NegativeInventory { sku: String, days_on_hand: i64 },
    DecisionFunctionError { item1: String, item2: String, error: String },
    MissingAuditTrail { description: String },
}

/// Audit area a violation is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationCategory {
    DataIntegrity,
    BusinessRules,
    DecisionLogic,
    AuditTrail,
}

impl Violation {
    pub fn category(&self) -> ViolationCategory {
        match self {
            Violation::MissingRequiredField { .. }
            | Violation::InvalidSkuFormat { .. }
            | Violation::InvalidPrice { .. }
            | Violation::MissingTechnicalSpec { .. } => ViolationCategory::DataIntegrity,
            Violation::DuplicateSku { .. } | Violation::NegativeInventory { .. } => {
                ViolationCategory::BusinessRules
            }
            Violation::DecisionFunctionError { .. } => ViolationCategory::DecisionLogic,
            Violation::MissingAuditTrail { .. } => ViolationCategory::AuditTrail,
        }
    }

    /// Violations that make the data set unfit for an unattended agent.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Violation::MissingRequiredField { .. }
                | Violation::DuplicateSku { .. }
                | Violation::DecisionFunctionError { .. }
        )
    }
}

/// Something suspicious that does not break a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    ExcessiveLeadTime { sku: String, lead_time: i64 },
    StaleData { file: String, age_days: u64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViolationSummary {
    pub data_integrity: usize,
    pub business_rules: usize,
    pub decision_logic: usize,
    pub audit_trail: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceAuditReport {
    pub timestamp: String,
    pub compliance_score: u32,
    pub total_violations: usize,
    pub total_warnings: usize,
    pub violations: Vec<Violation>,
    pub warnings: Vec<Warning>,
    pub summary: ViolationSummary,
}

/// Files the audit trail check looks at.
#[derive(Debug, Clone, Copy)]
pub struct AuditTrail<'a> {
    pub data_file: &'a Path,
    pub email_record: &'a Path,
}

/// The fields a purchase decision reads from a raw record. The price is only
/// needed on the proposed side.
#[derive(Debug, Deserialize)]
struct DecisionInputs {
    #[serde(rename = "Price", default)]
    price: Option<f64>,
    #[serde(rename = "TechnicalSpecs")]
    technical_specs: TechnicalSpecs,
}

impl DecisionInputs {
    fn from_record(index: usize, record: &Value) -> Result<Self> {
        Self::deserialize(record).map_err(|error| ToolError::InvalidRecord {
            index,
            reason: error.to_string(),
        })
    }
}

/// Validates the raw store against schema, business and audit-trail rules.
#[derive(Debug, Clone)]
pub struct IntegrityValidator {
    policy: PolicyConfig,
    sku_pattern: Regex,
}

impl IntegrityValidator {
    pub fn new(policy: PolicyConfig) -> Result<Self> {
        let sku_pattern =
            Regex::new(SKU_PATTERN).map_err(|error| ToolError::InvalidConfig(error.to_string()))?;
        Ok(Self {
            policy,
            sku_pattern,
        })
    }

    pub fn validate_data_integrity(&self, records: &[Value]) -> Vec<Violation> {
        let mut violations = Vec::new();
        for record in records {
            let sku = record_sku(record);
            for field in REQUIRED_FIELDS {
                if record.get(field).is_none_or(Value::is_null) {
                    violations.push(Violation::MissingRequiredField {
                        sku: sku.clone(),
                        field: field.to_string(),
                    });
                }
            }

            if let Some(raw_sku) = record.get("SKU").and_then(Value::as_str) {
                if !self.sku_pattern.is_match(raw_sku) {
                    violations.push(Violation::InvalidSkuFormat {
                        sku: raw_sku.to_string(),
                        expected_format: EXPECTED_SKU_FORMAT.to_string(),
                    });
                }
            }

            if let Some(price) = record.get("Price").filter(|price| !price.is_null()) {
                if price.as_f64().is_none_or(|value| value <= 0.0) {
                    violations.push(Violation::InvalidPrice {
                        sku: sku.clone(),
                        price: price.clone(),
                    });
                }
            }

            if let Some(specs) = record.get("TechnicalSpecs").and_then(Value::as_object) {
                for spec_field in SPEC_FIELDS {
                    if !specs.contains_key(spec_field) {
                        violations.push(Violation::MissingTechnicalSpec {
                            sku: sku.clone(),
                            missing_spec: spec_field.to_string(),
                        });
                    }
                }
            }
        }
        violations
    }

    pub fn validate_business_rules(&self, records: &[Value]) -> (Vec<Violation>, Vec<Warning>) {
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        let mut sku_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for sku in records
            .iter()
            .filter_map(|record| record.get("SKU").and_then(Value::as_str))
        {
            *sku_counts.entry(sku).or_default() += 1;
        }
        violations.extend(
            sku_counts
                .into_iter()
                .filter(|(_, count)| *count > 1)
                .map(|(sku, _)| Violation::DuplicateSku {
                    sku: sku.to_string(),
                }),
        );

        for record in records {
            if let Some(lead_time) = record.get("LeadTime").and_then(Value::as_i64) {
                if lead_time > self.policy.max_lead_time_days {
                    warnings.push(Warning::ExcessiveLeadTime {
                        sku: record_sku(record),
                        lead_time,
                    });
                }
            }
            if let Some(days_on_hand) = record.get("DaysOnHand").and_then(Value::as_i64) {
                if days_on_hand < 0 {
                    violations.push(Violation::NegativeInventory {
                        sku: record_sku(record),
                        days_on_hand,
                    });
                }
            }
        }
        (violations, warnings)
    }

    /// Runs the decision function over a sample of neighbouring records.
    /// Only the fields the decision reads can make a pair fail; other schema
    /// gaps are left to [`Self::validate_data_integrity`].
    pub fn validate_procurement_decisions(&self, records: &[Value]) -> Vec<Violation> {
        let mut violations = Vec::new();
        for i in 0..records.len().min(DECISION_SAMPLE) {
            let end = records.len().min(i + 1 + DECISION_WINDOW);
            for j in i + 1..end {
                if let Err(error) = self.evaluate_records(i, &records[i], j, &records[j]) {
                    violations.push(Violation::DecisionFunctionError {
                        item1: record_sku(&records[i]),
                        item2: record_sku(&records[j]),
                        error: error.to_string(),
                    });
                }
            }
        }
        violations
    }

    fn evaluate_records(
        &self,
        proposed_index: usize,
        proposed: &Value,
        current_index: usize,
        current: &Value,
    ) -> Result<Decision> {
        let proposed = DecisionInputs::from_record(proposed_index, proposed)?;
        let current = DecisionInputs::from_record(current_index, current)?;
        let price = proposed.price.ok_or_else(|| ToolError::InvalidRecord {
            index: proposed_index,
            reason: "missing field `Price`".to_string(),
        })?;
        Ok(evaluate_terms(
            &proposed.technical_specs,
            price,
            &current.technical_specs,
            self.policy.price_threshold,
        ))
    }

    pub fn validate_audit_trail(
        &self,
        trail: AuditTrail<'_>,
    ) -> Result<(Vec<Violation>, Vec<Warning>)> {
        let mut violations = Vec::new();
        let mut warnings = Vec::new();

        if !trail.email_record.exists() {
            violations.push(Violation::MissingAuditTrail {
                description: "Email records not found".to_string(),
            });
        }

        if trail.data_file.exists() {
            let modified = fs::metadata(trail.data_file)?.modified()?;
            let age = SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO);
            if age > Duration::from_secs(self.policy.stale_after_days * SECONDS_PER_DAY) {
                warn!(file = %trail.data_file.display(), "material data is stale");
                warnings.push(Warning::StaleData {
                    file: trail.data_file.display().to_string(),
                    age_days: age.as_secs() / SECONDS_PER_DAY,
                });
            }
        }
        Ok((violations, warnings))
    }

    #[instrument(level = "info", skip_all, fields(count = records.len()))]
    pub fn generate_report(
        &self,
        records: &[Value],
        trail: AuditTrail<'_>,
    ) -> Result<ComplianceAuditReport> {
        let mut violations = self.validate_data_integrity(records);
        let (business, mut warnings) = self.validate_business_rules(records);
        violations.extend(business);
        violations.extend(self.validate_procurement_decisions(records));
        let (trail_violations, trail_warnings) = self.validate_audit_trail(trail)?;
        violations.extend(trail_violations);
        warnings.extend(trail_warnings);

        let compliance_score = compliance_score(violations.len(), warnings.len());
        let summary = summarize(&violations);
        debug!(compliance_score, violations = violations.len(), "integrity audit complete");

        Ok(ComplianceAuditReport {
            timestamp: timestamp_now()?,
            compliance_score,
            total_violations: violations.len(),
            total_warnings: warnings.len(),
            violations,
            warnings,
            summary,
        })
    }
}

/// 100 minus 10 per violation and 2 per warning, floored at zero.
pub fn compliance_score(violations: usize, warnings: usize) -> u32 {
    let penalty = violations.saturating_mul(10).saturating_add(warnings.saturating_mul(2));
    100usize.saturating_sub(penalty) as u32
}

fn summarize(violations: &[Violation]) -> ViolationSummary {
    let mut summary = ViolationSummary::default();
    for violation in violations {
        match violation.category() {
            ViolationCategory::DataIntegrity => summary.data_integrity += 1,
            ViolationCategory::BusinessRules => summary.business_rules += 1,
            ViolationCategory::DecisionLogic => summary.decision_logic += 1,
            ViolationCategory::AuditTrail => summary.audit_trail += 1,
        }
    }
    summary
}

fn record_sku(record: &Value) -> String {
    record
        .get("SKU")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_SKU)
        .to_string()
}
