//! Low-stock supplier switch proposals.

use std::fmt::Write as _;

use serde::Serialize;
use tracing::{info, instrument};

use crate::procurement::desk::config::{DeskConfig, PolicyConfig};
use crate::procurement::desk::error::{Result, ToolError};
use crate::procurement::desk::io::materials::{load_materials, write_artifact};
use crate::procurement::desk::llm::LanguageModel;
use crate::procurement::desk::model::Material;
use crate::procurement::desk::portal::DraftOutcome;

/// File the supplier switch proposal is written to.
pub const SUPPLIER_SWITCH_FILE: &str = "supplier_switch_email.txt";

/// Days on hand assigned when a low-stock scenario is forced on a SKU.
pub const FORCED_LOW_STOCK_DAYS: i64 = 3;

/// A low-stock item and the offer that could replace it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstitutionProposal {
    pub current: Material,
    pub substitute: Material,
    pub draft: DraftOutcome,
}

/// First material other than `item` with identical specs from another supplier.
pub fn find_substitute<'a>(item: &Material, materials: &'a [Material]) -> Option<&'a Material> {
    materials.iter().find(|other| item.is_substitute(other))
}

/// First low-stock material that has a substitute, with that substitute.
pub fn find_low_stock_with_substitute<'a>(
    materials: &'a [Material],
    policy: &PolicyConfig,
) -> Option<(&'a Material, &'a Material)> {
    materials
        .iter()
        .filter(|item| item.days_on_hand < policy.low_stock_days)
        .find_map(|item| find_substitute(item, materials).map(|substitute| (item, substitute)))
}

/// Sets `sku` to a low-stock level so the switch flow has a candidate.
pub fn force_low_stock(materials: &mut [Material], sku: &str) -> Result<()> {
    let material = materials
        .iter_mut()
        .find(|material| material.sku == sku)
        .ok_or_else(|| ToolError::UnknownSku(sku.to_string()))?;
    material.days_on_hand = FORCED_LOW_STOCK_DAYS;
    Ok(())
}

/// Prompt asking the model to pitch the switch to R&D.
pub fn supplier_switch_prompt(current: &Material, substitute: &Material) -> String {
    format!(
        "Write a short professional email to the R&D department proposing a supplier switch.\n\n\
         Current item: {} from {} at ${} (only {} days remaining)\n\n\
         Proposed substitute: {} from {} at ${}\n\n\
         Both items have identical technical specifications: {}\n\n\
         Focus on the price difference and supply continuity. Keep it under 150 words.",
        current.sku,
        current.supplier_name,
        current.price,
        current.days_on_hand,
        substitute.sku,
        substitute.supplier_name,
        substitute.price,
        current.technical_specs
    )
}

/// Finds a switch candidate and drafts the proposal. The store is not
/// modified; a forced scenario only applies to this run.
#[instrument(level = "info", skip_all, fields(forced = force_sku.unwrap_or("")))]
pub fn propose_substitution(
    config: &DeskConfig,
    model: &dyn LanguageModel,
    force_sku: Option<&str>,
) -> Result<Option<SubstitutionProposal>> {
    let mut materials = load_materials(&config.paths.data_file)?;
    if let Some(sku) = force_sku {
        force_low_stock(&mut materials, sku)?;
    }

    let Some((current, substitute)) = find_low_stock_with_substitute(&materials, &config.policy)
    else {
        info!("no low-stock item with a substitute");
        return Ok(None);
    };
    info!(current = %current.sku, substitute = %substitute.sku, "substitute found");

    let draft = DraftOutcome::request(model, &supplier_switch_prompt(current, substitute));
    if let Some(text) = draft.text() {
        write_artifact(&config.paths.output(SUPPLIER_SWITCH_FILE), text)?;
    }
    Ok(Some(SubstitutionProposal {
        current: current.clone(),
        substitute: substitute.clone(),
        draft,
    }))
}

pub fn render_proposal(proposal: Option<&SubstitutionProposal>) -> String {
    let mut out = String::new();
    let Some(proposal) = proposal else {
        let _ = writeln!(out, "No low-stock items with a matching substitute");
        return out;
    };
    let _ = writeln!(
        out,
        "Low stock item found: {} ({} days)",
        proposal.current.sku, proposal.current.days_on_hand
    );
    let _ = writeln!(
        out,
        "Substitute found: {} from {}",
        proposal.substitute.sku, proposal.substitute.supplier_name
    );
    match &proposal.draft {
        DraftOutcome::Drafted(text) => {
            let _ = writeln!(out, "\nGenerated Email:\n{}\n{text}", "=".repeat(50));
            let _ = writeln!(out, "\nEmail saved to {SUPPLIER_SWITCH_FILE}");
        }
        DraftOutcome::Failed(error) => {
            let _ = writeln!(out, "Error generating email: {error}");
        }
    }
    out
}
