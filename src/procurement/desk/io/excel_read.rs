use std::collections::HashMap;
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};

use crate::procurement::desk::error::{Result, ToolError};
use crate::procurement::desk::flatten::{MATERIAL_COLUMNS, MATERIALS_SHEET};
use crate::procurement::desk::model::{
    ComplianceDocument, CompliancePackage, Material, TechnicalSpecs,
};

/// Reads materials back from a workbook produced by
/// [`excel_write`](crate::procurement::desk::io::excel_write). Rows without a
/// SKU are skipped; derived columns are ignored.
pub fn read_materials(path: &Path) -> Result<Vec<Material>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = read_required_sheet(&mut workbook, MATERIALS_SHEET)?;

    let mut rows = range.rows();
    let headers: HashMap<String, usize> = match rows.next() {
        Some(first_row) => first_row
            .iter()
            .enumerate()
            .map(|(idx, cell)| (cell_to_string(Some(cell)), idx))
            .collect(),
        None => return Ok(Vec::new()),
    };
    let columns = ColumnIndex::new(&headers)?;

    let mut materials = Vec::new();
    for row in rows {
        let sku = columns.text(row, "SKU");
        if sku.trim().is_empty() {
            continue;
        }
        materials.push(columns.material(row, sku)?);
    }
    Ok(materials)
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

/// Header name to column position, checked up front so every row lookup is
/// infallible.
struct ColumnIndex<'a> {
    headers: &'a HashMap<String, usize>,
}

impl<'a> ColumnIndex<'a> {
    fn new(headers: &'a HashMap<String, usize>) -> Result<Self> {
        let missing: Vec<&str> = MATERIAL_COLUMNS
            .iter()
            .copied()
            .chain(ComplianceDocument::ALL.iter().map(|doc| doc.key()))
            .filter(|column| !headers.contains_key(*column))
            .collect();
        if !missing.is_empty() {
            return Err(ToolError::InvalidWorkbook(format!(
                "sheet '{MATERIALS_SHEET}' is missing columns: {}",
                missing.join(", ")
            )));
        }
        Ok(Self { headers })
    }

    fn cell<'r>(&self, row: &'r [DataType], column: &str) -> Option<&'r DataType> {
        self.headers.get(column).and_then(|idx| row.get(*idx))
    }

    fn text(&self, row: &[DataType], column: &str) -> String {
        cell_to_string(self.cell(row, column))
    }

    fn number(&self, row: &[DataType], column: &str) -> Result<Option<f64>> {
        match self.cell(row, column) {
            None | Some(DataType::Empty) => Ok(None),
            Some(DataType::Float(value)) => Ok(Some(*value)),
            Some(DataType::Int(value)) => Ok(Some(*value as f64)),
            Some(DataType::String(value)) if value.trim().is_empty() => Ok(None),
            Some(DataType::String(value)) => value
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| invalid_cell(column, value)),
            Some(other) => Err(invalid_cell(column, &other.to_string())),
        }
    }

    fn required_number(&self, row: &[DataType], column: &str) -> Result<f64> {
        self.number(row, column)?
            .ok_or_else(|| invalid_cell(column, ""))
    }

    fn whole_number(&self, row: &[DataType], column: &str) -> Result<i64> {
        let value = self.required_number(row, column)?;
        if value.fract() != 0.0 {
            return Err(invalid_cell(column, &value.to_string()));
        }
        Ok(value as i64)
    }

    fn flag(&self, row: &[DataType], column: &str) -> Result<bool> {
        match self.cell(row, column) {
            Some(DataType::Bool(value)) => Ok(*value),
            None | Some(DataType::Empty) => Ok(false),
            Some(DataType::Int(value)) => Ok(*value != 0),
            Some(DataType::Float(value)) => Ok(*value != 0.0),
            Some(DataType::String(value)) => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" | "" => Ok(false),
                _ => Err(invalid_cell(column, value)),
            },
            Some(other) => Err(invalid_cell(column, &other.to_string())),
        }
    }

    fn material(&self, row: &[DataType], sku: String) -> Result<Material> {
        let tensile_strength = match self.number(row, "tensile_strength")? {
            Some(value) if value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) => {
                Some(value as u32)
            }
            Some(value) => return Err(invalid_cell("tensile_strength", &value.to_string())),
            None => None,
        };
        let grade = self.text(row, "grade");

        let mut compliance_package = CompliancePackage::uniform(false);
        for document in ComplianceDocument::ALL {
            compliance_package.set(document, self.flag(row, document.key())?);
        }

        Ok(Material {
            sku,
            cas_number: self.text(row, "cas_number"),
            inci_name: self.text(row, "inci_name"),
            supplier_name: self.text(row, "SupplierName"),
            price: self.required_number(row, "Price")?,
            lead_time: self.whole_number(row, "LeadTime")?,
            days_on_hand: self.whole_number(row, "DaysOnHand")?,
            technical_specs: TechnicalSpecs {
                density: self.number(row, "density")?,
                tensile_strength,
                grade: (!grade.trim().is_empty()).then_some(grade),
            },
            compliance_package,
        })
    }
}

fn invalid_cell(column: &str, value: &str) -> ToolError {
    ToolError::InvalidCell {
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
