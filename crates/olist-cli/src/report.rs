//! The reporting run: ten fixed read-only queries over one connection, each
//! result printed to the console as an aligned table.

use anyhow::Result;

use olist_analytics::config::DbConfig;
use olist_analytics::db::{connect, run_query};
use olist_analytics::queries::REPORT_QUERIES;

/// Execute the reporting queries sequentially and print every result table.
///
/// Any failure aborts the run; the connection is released on all exit paths
/// and closed explicitly on success.
pub fn run_report(db: &DbConfig) -> Result<()> {
    let mut client = connect(db)?;

    for query in REPORT_QUERIES {
        let table = run_query(&mut client, query.title, query.sql)?;
        log::info!("[{}] -> {} rows", query.title, table.n_rows());
        println!("\n=== {} ===", query.title);
        print!("{}", table);
    }

    client.close()?;
    Ok(())
}
