use std::path::Path;

use rust_xlsxwriter::{Chart, ChartType, Table, TableColumn, Workbook, Worksheet};

use crate::procurement::desk::error::Result;
use crate::procurement::desk::flatten::{CellValue, DASHBOARD_SHEET, DashboardData, WorkbookData};

/// Writes the provided workbook data to the given path, followed by a
/// dashboard sheet with native charts.
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let mut workbook_writer = Workbook::new();

    for table in &workbook.tables {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&table.sheet_name)?;

        for (col_idx, header) in table.columns.iter().enumerate() {
            worksheet.write_string(0, col_idx as u16, header)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                write_cell(worksheet, (row_idx + 1) as u32, col_idx as u16, cell)?;
            }
        }

        let columns: Vec<TableColumn> = table
            .columns
            .iter()
            .map(|header| TableColumn::new().set_header(header))
            .collect();
        let mut excel_table = Table::new();
        excel_table.set_autofilter(true).set_columns(&columns);

        let col_end = (table.columns.len() as u16).saturating_sub(1);
        // A table needs at least one data row below its header.
        let row_end = table.rows.len().max(1) as u32;
        worksheet.add_table(0, 0, row_end, col_end, &excel_table)?;
    }

    let dashboard = workbook_writer.add_worksheet();
    dashboard.set_name(DASHBOARD_SHEET)?;
    write_dashboard(dashboard, &workbook.dashboard)?;

    workbook_writer.save(path)?;
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<()> {
    match cell {
        CellValue::Text(value) => {
            worksheet.write_string(row, col, value)?;
        }
        CellValue::Number(value) => {
            worksheet.write_number(row, col, *value)?;
        }
        CellValue::Bool(value) => {
            worksheet.write_boolean(row, col, *value)?;
        }
        CellValue::Empty => {}
    }
    Ok(())
}

fn write_dashboard(worksheet: &mut Worksheet, data: &DashboardData) -> Result<()> {
    worksheet.write_string(0, 0, "Status")?;
    worksheet.write_string(0, 1, "Materials")?;
    worksheet.write_string(1, 0, "Ready for R&D")?;
    worksheet.write_number(1, 1, data.ready_for_rd as f64)?;
    worksheet.write_string(2, 0, "Missing Docs")?;
    worksheet.write_number(2, 1, data.missing_docs as f64)?;

    worksheet.write_string(0, 3, "Compliance Score")?;
    worksheet.write_string(0, 4, "Materials")?;
    for (score, count) in data.score_histogram.iter().enumerate() {
        let row = (score + 1) as u32;
        worksheet.write_number(row, 3, score as f64)?;
        worksheet.write_number(row, 4, *count as f64)?;
    }
    let last_bucket = data.score_histogram.len().max(1) as u32;

    let mut status_chart = Chart::new(ChartType::Pie);
    status_chart
        .add_series()
        .set_name("Compliance Status")
        .set_categories((DASHBOARD_SHEET, 1, 0, 2, 0))
        .set_values((DASHBOARD_SHEET, 1, 1, 2, 1));
    status_chart.title().set_name("Compliance Status");
    worksheet.insert_chart(0, 6, &status_chart)?;

    let mut score_chart = Chart::new(ChartType::Column);
    score_chart
        .add_series()
        .set_name("Materials")
        .set_categories((DASHBOARD_SHEET, 1, 3, last_bucket, 3))
        .set_values((DASHBOARD_SHEET, 1, 4, last_bucket, 4));
    score_chart.title().set_name("Compliance Score Distribution");
    score_chart.x_axis().set_name("Documents submitted");
    score_chart.y_axis().set_name("Materials");
    score_chart.legend().set_hidden();
    worksheet.insert_chart(16, 6, &score_chart)?;

    Ok(())
}
