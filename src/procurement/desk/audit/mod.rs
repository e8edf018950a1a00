//! Auditors that re-run the decision logic over the whole store and turn the
//! tallies into scores.

pub mod integrity;
pub mod master;
pub mod resilience;
pub mod stress;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::procurement::desk::error::Result;

pub use integrity::{ComplianceAuditReport, IntegrityValidator};
pub use master::{MasterAuditReport, MasterAuditor, RiskLevel};
pub use resilience::{ResilienceAuditor, ResilienceReport};
pub use stress::{StressTestReport, StressTester};

/// Current UTC time as RFC 3339.
pub fn timestamp_now() -> Result<String> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}

/// Outcome of a single stress or edge-case probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    Warning,
}
