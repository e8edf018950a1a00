use std::fmt;

use serde::{Deserialize, Serialize};

use crate::procurement::desk::model::{Material, TechnicalSpecs};

/// Outcome of evaluating a proposed purchase against the item it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "REJECTED: Specs Mismatch")]
    RejectedSpecsMismatch,
    #[serde(rename = "PENDING MANAGER")]
    PendingManager,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Approved => "APPROVED",
            Decision::RejectedSpecsMismatch => "REJECTED: Specs Mismatch",
            Decision::PendingManager => "PENDING MANAGER",
        }
    }

    pub fn is_rejected(self) -> bool {
        matches!(self, Decision::RejectedSpecsMismatch)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether `proposed` may replace `current`.
///
/// Specs must match exactly; a matching item priced strictly below
/// `price_threshold` is approved, anything else goes to a manager.
pub fn evaluate_purchase(proposed: &Material, current: &Material, price_threshold: f64) -> Decision {
    evaluate_terms(
        &proposed.technical_specs,
        proposed.price,
        &current.technical_specs,
        price_threshold,
    )
}

/// The decision over the only fields it reads: both spec sets and the
/// proposed price.
pub fn evaluate_terms(
    proposed_specs: &TechnicalSpecs,
    proposed_price: f64,
    current_specs: &TechnicalSpecs,
    price_threshold: f64,
) -> Decision {
    if proposed_specs != current_specs {
        return Decision::RejectedSpecsMismatch;
    }
    if proposed_price < price_threshold {
        Decision::Approved
    } else {
        Decision::PendingManager
    }
}
