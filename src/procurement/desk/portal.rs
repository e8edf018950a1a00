//! Supplier portal simulation: one document upload per session.

use std::fmt::Write as _;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::procurement::desk::compliance::{ComplianceCheck, check_compliance_completeness};
use crate::procurement::desk::config::PathsConfig;
use crate::procurement::desk::error::Result;
use crate::procurement::desk::io::materials::{load_materials, save_materials, write_artifact};
use crate::procurement::desk::llm::LanguageModel;
use crate::procurement::desk::model::{ComplianceDocument, DOCUMENT_COUNT, Material};

/// File the sample request email is written to.
pub const SAMPLE_REQUEST_FILE: &str = "sample_request_email.txt";

/// Outcome of asking the model for an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "text", rename_all = "snake_case")]
pub enum DraftOutcome {
    Drafted(String),
    Failed(String),
}

impl DraftOutcome {
    /// Calls the model, keeping a failure as data rather than aborting the
    /// surrounding flow.
    pub fn request(model: &dyn LanguageModel, prompt: &str) -> Self {
        match model.complete(prompt) {
            Ok(text) => DraftOutcome::Drafted(text),
            Err(error) => {
                warn!(%error, "email drafting failed");
                DraftOutcome::Failed(error.to_string())
            }
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DraftOutcome::Drafted(text) => Some(text),
            DraftOutcome::Failed(_) => None,
        }
    }
}

/// A document the simulated supplier uploaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentUpload {
    pub sku: String,
    pub inci_name: String,
    pub cas_number: String,
    pub supplier_name: String,
    pub document: ComplianceDocument,
    pub missing_before: Vec<ComplianceDocument>,
    pub after: ComplianceCheck,
}

/// A sample request drafted for a fully compliant material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRequest {
    pub sku: String,
    pub inci_name: String,
    pub cas_number: String,
    pub draft: DraftOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortalRun {
    /// `None` when every material was already compliant.
    pub upload: Option<DocumentUpload>,
    pub sample_request: Option<SampleRequest>,
}

/// Prompt asking the model for a 100g sample request.
pub fn sample_request_prompt(material: &Material) -> String {
    format!(
        "You are a Procurement Agent. The supplier {} has submitted all {} compliance docs for {}. \
         Write a polite email to them requesting a 100g sample for our Lab Batch testing. \
         Reference the specific CAS number {}.",
        material.supplier_name, DOCUMENT_COUNT, material.inci_name, material.cas_number
    )
}

fn request_sample(material: &Material, model: &dyn LanguageModel) -> SampleRequest {
    SampleRequest {
        sku: material.sku.clone(),
        inci_name: material.inci_name.clone(),
        cas_number: material.cas_number.clone(),
        draft: DraftOutcome::request(model, &sample_request_prompt(material)),
    }
}

/// Uploads the first missing document of the first incomplete material.
///
/// When that upload completes the package a sample request is drafted. When
/// no material is missing anything, the request is drafted for the first
/// material instead.
pub fn simulate_portal(materials: &mut [Material], model: &dyn LanguageModel) -> PortalRun {
    let target = materials.iter().enumerate().find_map(|(index, material)| {
        let check = check_compliance_completeness(&material.compliance_package);
        (!check.is_ready()).then_some((index, check.missing))
    });

    let Some((index, missing_before)) = target else {
        info!("all materials are fully compliant");
        let sample_request = materials.first().map(|material| request_sample(material, model));
        return PortalRun {
            upload: None,
            sample_request,
        };
    };

    let material = &mut materials[index];
    // an incomplete package always has at least one missing document
    let document = missing_before[0];
    material.compliance_package.submit(document);
    let after = check_compliance_completeness(&material.compliance_package);
    info!(sku = %material.sku, %document, score = after.score(), "document uploaded");

    let sample_request = after.is_ready().then(|| request_sample(material, model));
    PortalRun {
        upload: Some(DocumentUpload {
            sku: material.sku.clone(),
            inci_name: material.inci_name.clone(),
            cas_number: material.cas_number.clone(),
            supplier_name: material.supplier_name.clone(),
            document,
            missing_before,
            after,
        }),
        sample_request,
    }
}

/// Runs one portal session against the store: load, upload, persist, and
/// save any drafted email.
#[instrument(level = "info", skip_all, fields(data_file = %paths.data_file.display()))]
pub fn portal_session(paths: &PathsConfig, model: &dyn LanguageModel) -> Result<PortalRun> {
    let mut materials = load_materials(&paths.data_file)?;
    let run = simulate_portal(&mut materials, model);
    if run.upload.is_some() {
        save_materials(&paths.data_file, &materials)?;
    }
    if let Some(text) = run.sample_request.as_ref().and_then(|request| request.draft.text()) {
        write_artifact(&paths.output(SAMPLE_REQUEST_FILE), text)?;
    }
    Ok(run)
}

/// Console transcript of a portal session.
pub fn render_portal(run: &PortalRun) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Supplier Portal - Document Upload System");
    let _ = writeln!(out, "{}", "=".repeat(50));

    match &run.upload {
        None => {
            let _ = writeln!(out, "All materials are fully compliant!");
        }
        Some(upload) => {
            let _ = writeln!(
                out,
                "Auto-selected Material: {} ({})",
                upload.inci_name, upload.cas_number
            );
            let _ = writeln!(out, "Supplier: {}", upload.supplier_name);
            let _ = writeln!(
                out,
                "Score before upload: {}/{} documents",
                DOCUMENT_COUNT - upload.missing_before.len(),
                DOCUMENT_COUNT
            );
            let _ = writeln!(out, "Missing Documents ({}):", upload.missing_before.len());
            for document in &upload.missing_before {
                let _ = writeln!(out, "   - {document}");
            }
            let _ = writeln!(out, "Uploaded: {}", upload.document);
            let _ = writeln!(out, "Updated Status: {}", upload.after.status);
            let _ = writeln!(
                out,
                "Score: {}/{} documents",
                upload.after.score(),
                DOCUMENT_COUNT
            );
            if upload.after.is_ready() {
                let _ = writeln!(out, "All documents complete! Material is now READY FOR R&D!");
            } else {
                let remaining: Vec<&str> =
                    upload.after.missing.iter().map(|document| document.key()).collect();
                let _ = writeln!(out, "Remaining missing docs: {}", remaining.join(", "));
            }
        }
    }

    if let Some(request) = &run.sample_request {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Sample request for {} ({}):",
            request.inci_name, request.cas_number
        );
        match &request.draft {
            DraftOutcome::Drafted(text) => {
                let _ = writeln!(out, "{}", "=".repeat(50));
                let _ = writeln!(out, "{text}");
                let _ = writeln!(out, "{}", "=".repeat(50));
                let _ = writeln!(out, "Email saved to {SAMPLE_REQUEST_FILE}");
            }
            DraftOutcome::Failed(error) => {
                let _ = writeln!(out, "Error generating email: {error}");
            }
        }
    }
    out
}
