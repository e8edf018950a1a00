use crate::procurement::desk::compare::compare_suppliers;
use crate::procurement::desk::model::{ComplianceDocument, Material};

/// Sheet holding one row per material.
pub const MATERIALS_SHEET: &str = "Materials";
/// Sheet holding the multi-supplier offers per CAS number.
pub const COMPARISON_SHEET: &str = "Comparison";
/// Sheet holding the summary figures and native charts.
pub const DASHBOARD_SHEET: &str = "Dashboard";

/// Fixed leading columns of the materials sheet; document columns follow.
pub const MATERIAL_COLUMNS: [&str; 10] = [
    "SKU",
    "cas_number",
    "inci_name",
    "SupplierName",
    "Price",
    "LeadTime",
    "DaysOnHand",
    "density",
    "tensile_strength",
    "grade",
];
/// Derived trailing column; ignored on import.
pub const SCORE_COLUMN: &str = "compliance_score";

/// A typed spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    fn text(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }

    fn optional_number(value: Option<f64>) -> Self {
        value.map_or(CellValue::Empty, CellValue::Number)
    }
}

/// A table that will be materialised as an Excel sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Summary figures charted on the dashboard sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub ready_for_rd: usize,
    pub missing_docs: usize,
    /// Number of materials per compliance score, indexed by score.
    pub score_histogram: Vec<usize>,
}

/// Represents all tables required to materialise the Excel workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    pub tables: Vec<SheetTable>,
    pub dashboard: DashboardData,
}

/// Flattens materials into the materials and comparison tables plus the
/// dashboard figures.
pub fn build_workbook(materials: &[Material]) -> WorkbookData {
    WorkbookData {
        tables: vec![materials_table(materials), comparison_table(materials)],
        dashboard: dashboard_data(materials),
    }
}

/// Header row of the materials sheet.
pub fn material_headers() -> Vec<String> {
    MATERIAL_COLUMNS
        .iter()
        .map(|column| column.to_string())
        .chain(ComplianceDocument::ALL.iter().map(|doc| doc.key().to_string()))
        .chain(std::iter::once(SCORE_COLUMN.to_string()))
        .collect()
}

fn materials_table(materials: &[Material]) -> SheetTable {
    let rows = materials
        .iter()
        .map(|material| {
            let specs = &material.technical_specs;
            let mut row = vec![
                CellValue::text(&material.sku),
                CellValue::text(&material.cas_number),
                CellValue::text(&material.inci_name),
                CellValue::text(&material.supplier_name),
                CellValue::Number(material.price),
                CellValue::Number(material.lead_time as f64),
                CellValue::Number(material.days_on_hand as f64),
                CellValue::optional_number(specs.density),
                CellValue::optional_number(specs.tensile_strength.map(f64::from)),
                specs.grade.as_deref().map_or(CellValue::Empty, CellValue::text),
            ];
            row.extend(
                ComplianceDocument::ALL
                    .iter()
                    .map(|doc| CellValue::Bool(material.compliance_package.is_submitted(*doc))),
            );
            row.push(CellValue::Number(material.compliance_score() as f64));
            row
        })
        .collect();

    SheetTable {
        sheet_name: MATERIALS_SHEET.to_string(),
        columns: material_headers(),
        rows,
    }
}

fn comparison_table(materials: &[Material]) -> SheetTable {
    let report = compare_suppliers(materials);
    let mut rows = Vec::new();
    for comparison in &report.comparisons {
        for option in &comparison.options {
            rows.push(vec![
                CellValue::text(&comparison.cas_number),
                CellValue::text(&comparison.inci_name),
                CellValue::text(&option.sku),
                CellValue::text(&option.supplier_name),
                CellValue::Number(option.price),
                CellValue::Number(option.compliance_score as f64),
                CellValue::text(&option.status),
                CellValue::Bool(option.sku == comparison.cheapest.sku),
                CellValue::Bool(option.sku == comparison.most_compliant.sku),
            ]);
        }
    }

    SheetTable {
        sheet_name: COMPARISON_SHEET.to_string(),
        columns: [
            "cas_number",
            "inci_name",
            "SKU",
            "SupplierName",
            "Price",
            "compliance_score",
            "status",
            "cheapest",
            "most_compliant",
        ]
        .iter()
        .map(|column| column.to_string())
        .collect(),
        rows,
    }
}

fn dashboard_data(materials: &[Material]) -> DashboardData {
    let mut score_histogram = vec![0; ComplianceDocument::ALL.len() + 1];
    for material in materials {
        if let Some(bucket) = score_histogram.get_mut(material.compliance_score()) {
            *bucket += 1;
        }
    }
    let ready_for_rd = score_histogram.last().copied().unwrap_or(0);
    DashboardData {
        ready_for_rd,
        missing_docs: materials.len() - ready_for_rd,
        score_histogram,
    }
}
