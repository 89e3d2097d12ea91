//! Spreadsheet export. Every non-animated result table becomes one worksheet
//! in a single workbook: bold header row, frozen panes at B2, autofilter over
//! the used range, and a red-yellow-green color scale on every numeric
//! column's data rows.

use std::path::Path;

use anyhow::{bail, Context, Result};
use rust_xlsxwriter::{ConditionalFormat3ColorScale, Format, Workbook};

use crate::table::{ColumnData, ResultTable};

/// Totals reported after an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub sheets: usize,
    pub rows: usize,
}

/// Write the tables into a workbook file, creating parent directories.
pub fn export_tables(tables: &[ResultTable], path: &Path) -> Result<ExportSummary> {
    let (mut workbook, summary) = build_workbook(tables)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create export directory {}", parent.display()))?;
        }
    }
    workbook
        .save(path)
        .with_context(|| format!("Failed to write workbook {}", path.display()))?;
    Ok(summary)
}

/// Buffer variant of `export_tables`, used by tests.
pub fn export_to_buffer(tables: &[ResultTable]) -> Result<(Vec<u8>, ExportSummary)> {
    let (mut workbook, summary) = build_workbook(tables)?;
    let buffer = workbook
        .save_to_buffer()
        .context("Failed to serialize workbook")?;
    Ok((buffer, summary))
}

fn build_workbook(tables: &[ResultTable]) -> Result<(Workbook, ExportSummary)> {
    if tables.is_empty() {
        bail!("No result tables to export");
    }

    let header_format = Format::new().set_bold().set_background_color(0xD9E1F2);
    let mut workbook = Workbook::new();
    let mut total_rows = 0usize;

    for table in tables {
        let mut table = table.clone();
        table.normalize_months();

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&table.name)
            .with_context(|| format!("Invalid sheet name '{}'", table.name))?;

        let n_rows = table.n_rows();
        let n_cols = table.n_cols();

        for (col_idx, column) in table.columns.iter().enumerate() {
            let col = col_idx as u16;
            worksheet.write_with_format(0, col, column.name.as_str(), &header_format)?;

            let mut width = column.name.len();
            for row in 0..n_rows {
                let cell_row = (row + 1) as u32;
                match &column.data {
                    ColumnData::Int(values) => {
                        if let Some(cell) = values[row] {
                            worksheet.write(cell_row, col, cell)?;
                        }
                    }
                    ColumnData::Float(values) => {
                        if let Some(cell) = values[row] {
                            worksheet.write(cell_row, col, cell)?;
                        }
                    }
                    // NULL text cells stay blank; timestamps were normalized
                    // to year-month text above, any stragglers are rendered.
                    ColumnData::Text(_) | ColumnData::Timestamp(_) => {
                        let rendered = column.data.cell_to_string(row);
                        if !rendered.is_empty() {
                            worksheet.write(cell_row, col, rendered.as_str())?;
                        }
                    }
                }
                width = width.max(column.data.cell_to_string(row).len());
            }
            worksheet.set_column_width(col, (width + 2).min(40) as f64)?;

            // Three-point scale anchored at min / 50th percentile / max,
            // spanning exactly the data rows (Excel rows 2..=N+1).
            if column.data.is_numeric() && n_rows > 0 {
                let scale = ConditionalFormat3ColorScale::new()
                    .set_minimum_color(0xAA0000)
                    .set_midpoint_color(0xFFFF00)
                    .set_maximum_color(0x00AA00);
                worksheet.add_conditional_format(1, col, n_rows as u32, col, &scale)?;
            }
        }

        if n_cols > 0 {
            worksheet.autofilter(0, 0, n_rows as u32, (n_cols - 1) as u16)?;
        }
        worksheet.set_freeze_panes(1, 1)?;

        total_rows += n_rows;
    }

    Ok((
        workbook,
        ExportSummary {
            sheets: tables.len(),
            rows: total_rows,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn sample_table(name: &str, rows: usize) -> ResultTable {
        ResultTable::new(
            name,
            vec![
                Column {
                    name: "label".into(),
                    data: ColumnData::Text((0..rows).map(|i| Some(format!("r{}", i))).collect()),
                },
                Column {
                    name: "value".into(),
                    data: ColumnData::Int((0..rows).map(|i| Some(i as i64 * 10)).collect()),
                },
            ],
        )
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(export_to_buffer(&[]).is_err());
    }

    #[test]
    fn summary_counts_sheets_and_rows() {
        let tables = vec![sample_table("a", 3), sample_table("b", 5)];
        let (_, summary) = export_to_buffer(&tables).unwrap();
        assert_eq!(summary.sheets, 2);
        assert_eq!(summary.rows, 8);
    }

    #[test]
    fn produces_a_zip_container() {
        let tables = vec![sample_table("only", 2)];
        let (bytes, _) = export_to_buffer(&tables).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn empty_result_set_still_gets_a_sheet() {
        let tables = vec![sample_table("empty", 0)];
        let (bytes, summary) = export_to_buffer(&tables).unwrap();
        assert_eq!(summary.sheets, 1);
        assert_eq!(summary.rows, 0);
        assert_eq!(&bytes[0..2], b"PK");
    }
}
