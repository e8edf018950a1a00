use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::procurement::desk::model::{CompliancePackage, ComplianceDocument, DOCUMENT_COUNT, Material};

/// Readiness of a material for R&D sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplianceStatus {
    #[serde(rename = "READY_FOR_R&D")]
    ReadyForRnd,
    #[serde(rename = "MISSING_DOCS")]
    MissingDocs,
}

impl ComplianceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ComplianceStatus::ReadyForRnd => "READY_FOR_R&D",
            ComplianceStatus::MissingDocs => "MISSING_DOCS",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of checking one compliance package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceCheck {
    pub status: ComplianceStatus,
    /// Outstanding documents in canonical order; empty when ready.
    pub missing: Vec<ComplianceDocument>,
}

impl ComplianceCheck {
    /// Documents on file, out of [`DOCUMENT_COUNT`].
    pub fn score(&self) -> usize {
        DOCUMENT_COUNT - self.missing.len()
    }

    pub fn is_ready(&self) -> bool {
        self.status == ComplianceStatus::ReadyForRnd
    }
}

/// A package is complete only when all documents are on file.
pub fn check_compliance_completeness(package: &CompliancePackage) -> ComplianceCheck {
    if package.submitted_count() == DOCUMENT_COUNT {
        ComplianceCheck {
            status: ComplianceStatus::ReadyForRnd,
            missing: Vec::new(),
        }
    } else {
        ComplianceCheck {
            status: ComplianceStatus::MissingDocs,
            missing: package.missing(),
        }
    }
}

/// Status lines for the first `limit` materials.
pub fn render_compliance_overview(materials: &[Material], limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Compliance Check Results:");
    let _ = writeln!(out, "{}", "=".repeat(50));
    for (index, material) in materials.iter().take(limit).enumerate() {
        let check = check_compliance_completeness(&material.compliance_package);
        let _ = writeln!(
            out,
            "\nItem {}: {} ({})",
            index + 1,
            material.inci_name,
            material.cas_number
        );
        let _ = writeln!(out, "Status: {}", check.status);
        if !check.missing.is_empty() {
            let missing: Vec<&str> = check.missing.iter().map(|doc| doc.key()).collect();
            let _ = writeln!(out, "Missing docs: {}", missing.join(", "));
        }
        let _ = writeln!(out, "Compliance score: {}/{DOCUMENT_COUNT}", check.score());
    }
    out
}
