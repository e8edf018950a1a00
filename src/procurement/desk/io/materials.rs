use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::procurement::desk::error::{Result, ToolError};
use crate::procurement::desk::model::Material;

/// Reads the material store as typed records.
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn load_materials(path: &Path) -> Result<Vec<Material>> {
    let materials = load_raw(path)?
        .into_iter()
        .enumerate()
        .map(|(index, value)| Material::from_value(index, value))
        .collect::<Result<Vec<_>>>()?;
    debug!(count = materials.len(), "materials loaded");
    Ok(materials)
}

/// Reads the material store without schema enforcement. The integrity
/// validator works on this view so it can report malformed records instead
/// of failing on the first one.
pub fn load_raw(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    let source = fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&source)? {
        Value::Array(records) => Ok(records),
        _ => Err(ToolError::InvalidRecord {
            index: 0,
            reason: "material store must be a JSON array".to_string(),
        }),
    }
}

/// Rewrites the whole store.
#[instrument(level = "debug", skip(materials), fields(path = %path.display(), count = materials.len()))]
pub fn save_materials(path: &Path, materials: &[Material]) -> Result<()> {
    write_json(path, &materials)
}

/// Writes a text artefact, creating the parent directory when needed.
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Serialises any report as pretty JSON.
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_artifact(path, &json)
}
