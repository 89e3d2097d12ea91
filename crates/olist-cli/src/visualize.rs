//! The chart/export run: seven fixed queries, six static chart files, one
//! interactive month-stepped chart, and a formatted multi-sheet workbook.

use std::path::PathBuf;

use anyhow::{Context, Result};

use olist_analytics::charts::{animated_orders_by_state, render, save_chart};
use olist_analytics::config::DbConfig;
use olist_analytics::db::{connect, run_query};
use olist_analytics::excel::export_tables;
use olist_analytics::queries::{ChartRole, VISUAL_QUERIES};
use olist_analytics::table::ResultTable;

/// Parameters for one visualization run.
#[derive(Debug, Clone)]
pub struct VisualizeConfig {
    pub db: DbConfig,
    pub charts_dir: PathBuf,
    pub export_path: PathBuf,
    /// Open the animated chart in the system browser after writing it.
    pub show_animated: bool,
}

impl Default for VisualizeConfig {
    fn default() -> Self {
        Self {
            db: DbConfig::default(),
            charts_dir: PathBuf::from("charts"),
            export_path: PathBuf::from("exports/export.xlsx"),
            show_animated: false,
        }
    }
}

/// Run every visual query in order, render its chart, then export all
/// non-animated tables into one workbook.
pub fn run_visualize(config: &VisualizeConfig) -> Result<()> {
    let mut client = connect(&config.db)?;

    let mut exportable: Vec<ResultTable> = Vec::new();
    let mut animated: Option<ResultTable> = None;

    for query in VISUAL_QUERIES {
        let table = run_query(&mut client, query.name, query.sql)?;
        log::info!("[{}] -> {} rows", query.name, table.n_rows());

        match query.role {
            ChartRole::Static(kind) => {
                let plot = render(kind, &table)
                    .with_context(|| format!("Failed to render chart '{}'", query.name))?;
                let path = save_chart(&plot, &config.charts_dir, query.name)?;
                log::info!("Saved {}", path.display());
                exportable.push(table);
            }
            ChartRole::Animated => animated = Some(table),
        }
    }

    if let Some(table) = animated {
        let plot = animated_orders_by_state(&table)?;
        let path = save_chart(&plot, &config.charts_dir, "slider_chart")?;
        log::info!("Saved {}", path.display());
        if config.show_animated {
            plot.show();
        }
    }

    let summary = export_tables(&exportable, &config.export_path)?;
    let file_name = config
        .export_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.export_path.display().to_string());
    println!(
        "Created file {}, {} sheets, {} rows.",
        file_name, summary.sheets, summary.rows
    );

    client.close()?;
    Ok(())
}
