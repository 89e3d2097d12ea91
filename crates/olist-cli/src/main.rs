use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use olist_analytics::config::{load_db_config, DbConfig};
use olist_cli::report::run_report;
use olist_cli::visualize::{run_visualize, VisualizeConfig};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("OLIST_LOG", "error,olist=info"))
        .init();

    let matches = Command::new("olist")
        .version(clap::crate_version!())
        .about("Analytical reports, charts and spreadsheet exports for the Olist e-commerce dataset")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("report")
                .about("Run the ten reporting queries and print each result table")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON file with database settings; defaults are used otherwise")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("visualize")
                .about("Render the seven fixed charts and export the result tables to a workbook")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON file with database settings; defaults are used otherwise")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("charts_dir")
                        .long("charts-dir")
                        .help("Directory for the chart HTML files")
                        .default_value("charts")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Path of the exported workbook")
                        .default_value("exports/export.xlsx")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("show")
                        .long("show")
                        .help("Open the animated chart in the system browser")
                        .action(ArgAction::SetTrue),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("report", sub_m)) => handle_report(sub_m),
        Some(("visualize", sub_m)) => handle_visualize(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn load_db(matches: &ArgMatches) -> Result<DbConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => load_db_config(path),
        None => Ok(DbConfig::default()),
    }
}

fn handle_report(matches: &ArgMatches) -> Result<()> {
    let db = load_db(matches)?;
    log::info!("[Olist::Report] Connecting to {}:{}", db.host, db.port);

    match run_report(&db) {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("Report failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_visualize(matches: &ArgMatches) -> Result<()> {
    let db = load_db(matches)?;
    let config = VisualizeConfig {
        db,
        charts_dir: matches
            .get_one::<PathBuf>("charts_dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("charts")),
        export_path: matches
            .get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("exports/export.xlsx")),
        show_animated: matches.get_flag("show"),
    };
    log::info!(
        "[Olist::Visualize] Charts to {:?}, workbook to {:?}",
        config.charts_dir,
        config.export_path
    );

    match run_visualize(&config) {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("Visualization failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
