use std::error::Error;
use std::fmt;

use chrono::NaiveDateTime;

/// Error type for result-table access failures.
#[derive(Debug)]
pub enum TableError {
    ColumnNotFound(String),
    TypeMismatch { column: String, expected: &'static str },
    NullValue(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TableError::ColumnNotFound(name) => write!(f, "Column '{}' not found", name),
            TableError::TypeMismatch { column, expected } => {
                write!(f, "Column '{}' is not of the expected type {}", column, expected)
            }
            TableError::NullValue(column) => {
                write!(f, "Column '{}' contains NULL values where none are allowed", column)
            }
        }
    }
}

impl Error for TableError {}

/// Column payload. Every variant keeps `Option` cells so SQL NULLs from
/// outer joins survive into printing and export.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for the variants that get a color scale in the spreadsheet.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnData::Int(_) | ColumnData::Float(_))
    }

    pub(crate) fn cell_to_string(&self, row: usize) -> String {
        match self {
            ColumnData::Int(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
            ColumnData::Float(v) => v[row].map(|x| format!("{:.2}", x)).unwrap_or_default(),
            ColumnData::Text(v) => v[row].clone().unwrap_or_default(),
            ColumnData::Timestamp(v) => v[row]
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        }
    }
}

/// A named, typed column of a result table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// An in-memory rectangular dataset returned by one query. Created by
/// `db::run_query`, consumed by a chart renderer, the console printer or the
/// spreadsheet writer, and discarded at the end of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub name: String,
    pub columns: Vec<Column>,
}

impl ResultTable {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Result<&Column, TableError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    /// Dense string values of a text column. NULL cells become empty strings,
    /// matching how the console printer and the workbook render them.
    pub fn text_values(&self, name: &str) -> Result<Vec<String>, TableError> {
        let column = self.column(name)?;
        match &column.data {
            ColumnData::Text(v) => Ok(v
                .iter()
                .map(|cell| cell.clone().unwrap_or_default())
                .collect()),
            _ => Err(TableError::TypeMismatch {
                column: name.to_string(),
                expected: "text",
            }),
        }
    }

    /// Dense numeric values of an int or float column. The chart queries use
    /// inner joins and aggregates, so a NULL here is a hard error.
    pub fn f64_values(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let column = self.column(name)?;
        let cells: Vec<Option<f64>> = match &column.data {
            ColumnData::Int(v) => v.iter().map(|cell| cell.map(|x| x as f64)).collect(),
            ColumnData::Float(v) => v.clone(),
            _ => {
                return Err(TableError::TypeMismatch {
                    column: name.to_string(),
                    expected: "numeric",
                })
            }
        };
        cells
            .into_iter()
            .map(|cell| cell.ok_or_else(|| TableError::NullValue(name.to_string())))
            .collect()
    }

    /// Reformat every timestamp column to a `YYYY-MM` text column.
    ///
    /// Applying this twice is a no-op: the second pass finds no timestamp
    /// columns left. Non-date columns are never touched.
    pub fn normalize_months(&mut self) {
        for column in &mut self.columns {
            if let ColumnData::Timestamp(values) = &column.data {
                let formatted = values
                    .iter()
                    .map(|cell| cell.map(|ts| ts.format("%Y-%m").to_string()))
                    .collect();
                column.data = ColumnData::Text(formatted);
            }
        }
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.columns.is_empty() {
            return writeln!(f, "(no columns)");
        }

        let n_rows = self.n_rows();
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.name.len()).collect();
        let mut cells: Vec<Vec<String>> = Vec::with_capacity(n_rows);

        for row in 0..n_rows {
            let mut rendered = Vec::with_capacity(self.columns.len());
            for (i, column) in self.columns.iter().enumerate() {
                let cell = column.data.cell_to_string(row);
                widths[i] = widths[i].max(cell.len());
                rendered.push(cell);
            }
            cells.push(rendered);
        }

        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, "  ")?;
            }
            write!(f, "{:<width$}", column.name, width = widths[i])?;
        }
        writeln!(f)?;

        for (i, _) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, "  ")?;
            }
            write!(f, "{}", "-".repeat(widths[i]))?;
        }
        writeln!(f)?;

        for row in cells {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:<width$}", cell, width = widths[i])?;
            }
            writeln!(f)?;
        }

        writeln!(f, "({} rows)", n_rows)
    }
}
