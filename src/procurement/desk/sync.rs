use std::path::Path;

use tracing::{debug, info, instrument};

use crate::procurement::desk::error::Result;
use crate::procurement::desk::flatten::build_workbook;
use crate::procurement::desk::io::{excel_read, excel_write, materials};

/// Exports the material store into an Excel workbook.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn json_to_excel(input: &Path, output: &Path) -> Result<()> {
    let records = materials::load_materials(input)?;
    info!(material_count = records.len(), "loaded materials from store");
    let workbook = build_workbook(&records);
    debug!(sheet_count = workbook.tables.len() + 1, "workbook constructed");
    excel_write::write_workbook(output, &workbook)
}

/// Rebuilds the material store from an Excel workbook.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn excel_to_json(input: &Path, output: &Path) -> Result<()> {
    let records = excel_read::read_materials(input)?;
    info!(material_count = records.len(), "read materials from workbook");
    materials::save_materials(output, &records)
}
