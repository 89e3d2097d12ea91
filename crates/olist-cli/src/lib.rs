//! olist-cli: runs the fixed reporting and visualization pipelines against
//! the Olist database.
pub mod report;
pub mod visualize;
