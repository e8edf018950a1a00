use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::procurement::desk::error::{Result, ToolError};

/// Number of documents in a complete compliance package.
pub const DOCUMENT_COUNT: usize = 11;

/// A document a supplier has to submit before a material can move to R&D.
///
/// The declaration order is the canonical order used when listing missing
/// documents and when laying out spreadsheet columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceDocument {
    CertificateOfAnalysis,
    SafetyDataSheet,
    TechnicalDataSheet,
    AllergenStatement,
    ReachDeclaration,
    GmoStatement,
    HeavyMetalsReport,
    MicrobiologicalReport,
    AnimalTestingStatement,
    HalalCertificate,
    KosherCertificate,
}

impl ComplianceDocument {
    /// All documents in canonical order.
    pub const ALL: [ComplianceDocument; DOCUMENT_COUNT] = [
        ComplianceDocument::CertificateOfAnalysis,
        ComplianceDocument::SafetyDataSheet,
        ComplianceDocument::TechnicalDataSheet,
        ComplianceDocument::AllergenStatement,
        ComplianceDocument::ReachDeclaration,
        ComplianceDocument::GmoStatement,
        ComplianceDocument::HeavyMetalsReport,
        ComplianceDocument::MicrobiologicalReport,
        ComplianceDocument::AnimalTestingStatement,
        ComplianceDocument::HalalCertificate,
        ComplianceDocument::KosherCertificate,
    ];

    /// Key used in JSON payloads and spreadsheet headers.
    pub fn key(self) -> &'static str {
        match self {
            ComplianceDocument::CertificateOfAnalysis => "certificate_of_analysis",
            ComplianceDocument::SafetyDataSheet => "safety_data_sheet",
            ComplianceDocument::TechnicalDataSheet => "technical_data_sheet",
            ComplianceDocument::AllergenStatement => "allergen_statement",
            ComplianceDocument::ReachDeclaration => "reach_declaration",
            ComplianceDocument::GmoStatement => "gmo_statement",
            ComplianceDocument::HeavyMetalsReport => "heavy_metals_report",
            ComplianceDocument::MicrobiologicalReport => "microbiological_report",
            ComplianceDocument::AnimalTestingStatement => "animal_testing_statement",
            ComplianceDocument::HalalCertificate => "halal_certificate",
            ComplianceDocument::KosherCertificate => "kosher_certificate",
        }
    }

    /// Resolves a document from its key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|document| document.key() == key)
    }
}

impl fmt::Display for ComplianceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Submission flags for the documents of a single material. Documents absent
/// from the map are treated as not submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompliancePackage {
    documents: BTreeMap<ComplianceDocument, bool>,
}

impl CompliancePackage {
    /// Package with every document set to `submitted`.
    pub fn uniform(submitted: bool) -> Self {
        Self {
            documents: ComplianceDocument::ALL
                .into_iter()
                .map(|document| (document, submitted))
                .collect(),
        }
    }

    /// Returns whether the document has been submitted.
    pub fn is_submitted(&self, document: ComplianceDocument) -> bool {
        self.documents.get(&document).copied().unwrap_or(false)
    }

    /// Sets the submission flag for a document.
    pub fn set(&mut self, document: ComplianceDocument, submitted: bool) {
        self.documents.insert(document, submitted);
    }

    /// Marks a document as submitted.
    pub fn submit(&mut self, document: ComplianceDocument) {
        self.set(document, true);
    }

    /// Number of submitted documents, out of [`DOCUMENT_COUNT`].
    pub fn submitted_count(&self) -> usize {
        self.documents.values().filter(|submitted| **submitted).count()
    }

    /// Documents still outstanding, in canonical order.
    pub fn missing(&self) -> Vec<ComplianceDocument> {
        ComplianceDocument::ALL
            .into_iter()
            .filter(|document| !self.is_submitted(*document))
            .collect()
    }
}

/// Physical properties used to decide whether two materials are
/// interchangeable. Equality is exact, field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tensile_strength: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}

impl TechnicalSpecs {
    /// Creates a fully populated spec set.
    pub fn new(density: f64, tensile_strength: u32, grade: impl Into<String>) -> Self {
        Self {
            density: Some(density),
            tensile_strength: Some(tensile_strength),
            grade: Some(grade.into()),
        }
    }

    /// Returns true when no property is set.
    pub fn is_empty(&self) -> bool {
        self.density.is_none() && self.tensile_strength.is_none() && self.grade.is_none()
    }
}

impl fmt::Display for TechnicalSpecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(density) = self.density {
            parts.push(format!("density {density}"));
        }
        if let Some(strength) = self.tensile_strength {
            parts.push(format!("tensile strength {strength}"));
        }
        if let Some(grade) = &self.grade {
            parts.push(format!("grade {grade}"));
        }
        if parts.is_empty() {
            f.write_str("no specifications")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// A raw-material offer from one supplier. Field names on the wire follow the
/// layout of `raw_materials.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(rename = "SKU")]
    pub sku: String,
    pub cas_number: String,
    pub inci_name: String,
    #[serde(rename = "SupplierName")]
    pub supplier_name: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "LeadTime")]
    pub lead_time: i64,
    #[serde(rename = "DaysOnHand")]
    pub days_on_hand: i64,
    #[serde(rename = "TechnicalSpecs")]
    pub technical_specs: TechnicalSpecs,
    pub compliance_package: CompliancePackage,
}

impl Material {
    /// Parses an untyped JSON record. `index` is only used for error reporting.
    pub fn from_value(index: usize, value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|error| ToolError::InvalidRecord {
            index,
            reason: error.to_string(),
        })
    }

    /// Compliance score, out of [`DOCUMENT_COUNT`].
    pub fn compliance_score(&self) -> usize {
        self.compliance_package.submitted_count()
    }

    /// True when `other` could replace this material: identical specs from a
    /// different supplier.
    pub fn is_substitute(&self, other: &Material) -> bool {
        self.technical_specs == other.technical_specs && self.supplier_name != other.supplier_name
    }
}
