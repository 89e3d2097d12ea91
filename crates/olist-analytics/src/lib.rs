//! olist-analytics: fixed analytical queries over the Olist e-commerce
//! dataset, with chart rendering and spreadsheet export.
//!
//! The library is split into small, testable modules: `table` holds the
//! in-memory result tables, `db` executes the fixed queries over a single
//! blocking Postgres connection, `queries` is the query catalog, `charts`
//! turns tables into plotly figures, and `excel` writes the formatted
//! workbook. All control flow is sequential; a failed step aborts the run.
pub mod charts;
pub mod config;
pub mod db;
pub mod excel;
pub mod queries;
pub mod table;
