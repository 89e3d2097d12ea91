//! Integration tests for the spreadsheet export over a mock run: the same
//! seven-table shape the visualize pipeline produces, with the animated
//! table excluded from the workbook.

use chrono::NaiveDate;
use olist_analytics::excel::export_to_buffer;
use olist_analytics::queries::{ChartRole, VISUAL_QUERIES};
use olist_analytics::table::{Column, ColumnData, ResultTable};

fn ts(y: i32, m: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn mock_table(name: &str, rows: usize, with_month: bool) -> ResultTable {
    let mut columns = Vec::new();
    if with_month {
        columns.push(Column {
            name: "month".into(),
            data: ColumnData::Timestamp((0..rows).map(|i| Some(ts(2017, i as u32 + 1))).collect()),
        });
    }
    columns.push(Column {
        name: "label".into(),
        data: ColumnData::Text((0..rows).map(|i| Some(format!("v{}", i))).collect()),
    });
    columns.push(Column {
        name: "value".into(),
        data: ColumnData::Int((0..rows).map(|i| Some(i as i64)).collect()),
    });
    ResultTable::new(name, columns)
}

/// One mock table per visual query, sized differently so row totals are
/// distinguishable.
fn mock_run() -> Vec<(ChartRole, ResultTable)> {
    VISUAL_QUERIES
        .iter()
        .enumerate()
        .map(|(i, q)| (q.role, mock_table(q.name, i + 1, q.name == "line_chart")))
        .collect()
}

#[test]
fn one_sheet_per_table_excluding_animated() {
    let run = mock_run();
    let exportable: Vec<ResultTable> = run
        .iter()
        .filter(|(role, _)| *role != ChartRole::Animated)
        .map(|(_, t)| t.clone())
        .collect();

    let (_, summary) = export_to_buffer(&exportable).unwrap();
    // Sheet count plus the one animated table equals the number of queries.
    assert_eq!(summary.sheets + 1, VISUAL_QUERIES.len());
    assert_eq!(summary.sheets, 6);
}

#[test]
fn summary_rows_equal_sum_of_exported_tables() {
    let run = mock_run();
    let exportable: Vec<ResultTable> = run
        .iter()
        .filter(|(role, _)| *role != ChartRole::Animated)
        .map(|(_, t)| t.clone())
        .collect();
    let expected: usize = exportable.iter().map(|t| t.n_rows()).sum();

    let (bytes, summary) = export_to_buffer(&exportable).unwrap();
    assert_eq!(summary.rows, expected);
    assert_eq!(&bytes[0..2], b"PK");
}

#[test]
fn export_normalizes_month_columns_without_mutating_input() {
    let table = mock_table("line_chart", 2, true);
    let before = table.clone();
    let (_, summary) = export_to_buffer(std::slice::from_ref(&table)).unwrap();
    assert_eq!(summary.rows, 2);
    // The writer works on a copy; the caller's table is untouched.
    assert_eq!(table, before);
}

#[test]
fn numeric_columns_are_detected_for_color_scales() {
    let table = mock_table("bar_chart", 3, false);
    let numeric: Vec<&str> = table
        .columns
        .iter()
        .filter(|c| c.data.is_numeric())
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(numeric, vec!["value"]);
}
