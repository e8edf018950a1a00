//! Renderers turning the store and audit results into text, HTML and SVG.

pub mod audit_html;
pub mod audit_text;
pub mod charts;
pub mod dashboard;
pub mod summary;

use std::collections::BTreeSet;

use serde::Serialize;
use time::OffsetDateTime;

use crate::procurement::desk::compare::group_by_cas;
use crate::procurement::desk::error::{Result, ToolError};
use crate::procurement::desk::model::{DOCUMENT_COUNT, Material};

/// Artefact names written by the renderers.
pub const SYSTEM_REPORT_FILE: &str = "system_report.txt";
pub const DASHBOARD_HTML_FILE: &str = "dashboard.html";
pub const DASHBOARD_SVG_FILE: &str = "dashboard.svg";
pub const AUDIT_HTML_FILE: &str = "audit_report.html";
pub const AUDIT_SVG_FILE: &str = "audit_dashboard.svg";

/// Figures shown on the inventory dashboard and in the system report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryStats {
    pub total_materials: usize,
    pub unique_cas: usize,
    pub unique_suppliers: usize,
    pub ready_for_rd: usize,
    pub average_compliance: f64,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    /// Compliance score per material, in store order.
    pub compliance_scores: Vec<usize>,
    /// Chemicals offered by more than one supplier.
    pub multi_supplier_materials: usize,
}

impl InventoryStats {
    pub fn from_materials(materials: &[Material]) -> Result<Self> {
        if materials.is_empty() {
            return Err(ToolError::InsufficientData {
                required: 1,
                found: 0,
            });
        }
        let total = materials.len() as f64;
        let compliance_scores: Vec<usize> =
            materials.iter().map(Material::compliance_score).collect();
        let ready_for_rd = materials
            .iter()
            .filter(|material| material.compliance_score() == DOCUMENT_COUNT)
            .count();
        let prices = materials.iter().map(|material| material.price);

        Ok(Self {
            total_materials: materials.len(),
            unique_cas: materials
                .iter()
                .map(|material| material.cas_number.as_str())
                .collect::<BTreeSet<_>>()
                .len(),
            unique_suppliers: materials
                .iter()
                .map(|material| material.supplier_name.as_str())
                .collect::<BTreeSet<_>>()
                .len(),
            ready_for_rd,
            average_compliance: compliance_scores.iter().sum::<usize>() as f64 / total,
            average_price: prices.clone().sum::<f64>() / total,
            min_price: prices.clone().fold(f64::INFINITY, f64::min),
            max_price: prices.fold(f64::NEG_INFINITY, f64::max),
            compliance_scores,
            multi_supplier_materials: group_by_cas(materials)
                .values()
                .filter(|group| group.len() > 1)
                .count(),
        })
    }

    pub fn needing_documents(&self) -> usize {
        self.total_materials - self.ready_for_rd
    }

    pub fn ready_percentage(&self) -> f64 {
        self.ready_for_rd as f64 / self.total_materials as f64 * 100.0
    }
}

/// `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn display_timestamp(moment: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        moment.year(),
        moment.month() as u8,
        moment.day(),
        moment.hour(),
        moment.minute(),
        moment.second()
    )
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
