#![allow(dead_code)]

use std::path::Path;

use procurement_desk::config::{DeskConfig, PathsConfig};
use procurement_desk::llm::LanguageModel;
use procurement_desk::model::{ComplianceDocument, CompliancePackage, Material, TechnicalSpecs};
use procurement_desk::{Result, ToolError};

pub fn aluminium() -> TechnicalSpecs {
    TechnicalSpecs::new(2.7, 310, "6061-T6")
}

pub fn steel() -> TechnicalSpecs {
    TechnicalSpecs::new(7.85, 400, "A36")
}

pub fn material(sku: &str, supplier: &str, price: f64, specs: TechnicalSpecs) -> Material {
    Material {
        sku: sku.to_string(),
        cas_number: "56-81-5".to_string(),
        inci_name: "Glycerin".to_string(),
        supplier_name: supplier.to_string(),
        price,
        lead_time: 14,
        days_on_hand: 20,
        technical_specs: specs,
        compliance_package: CompliancePackage::uniform(true),
    }
}

pub fn with_missing(mut material: Material, missing: &[ComplianceDocument]) -> Material {
    for document in missing {
        material.compliance_package.set(*document, false);
    }
    material
}

pub fn config_in(dir: &Path) -> DeskConfig {
    let mut config = DeskConfig::default();
    config.paths = PathsConfig {
        data_file: dir.join("raw_materials.json"),
        output_dir: dir.to_path_buf(),
    };
    config.llm.offline = true;
    config
}

/// Echoes a fixed reply and remembers nothing.
pub struct ScriptedModel(pub &'static str);

impl LanguageModel for ScriptedModel {
    fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Always fails as a rejected API call would.
pub struct FailingModel;

impl LanguageModel for FailingModel {
    fn complete(&self, _prompt: &str) -> Result<String> {
        Err(ToolError::LlmResponse("service unavailable".to_string()))
    }
}
