use crate::config::ResolvedConfig;
use crate::downloader::HttpTransport;
use crate::errors::{AppError, AppResult};
use crate::sync::run_sync;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

fn build_command() -> Command<'static> {
    Command::new("placsp-sync")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .subcommand(
            Command::new("run")
                .about("Rebuild the tender history and active subset from the feed")
                .after_help("LICITAI_START_YEAR and LICITAI_ACTIVE_ONLY are read before the flags.\nExample:\n  placsp-sync run --start-year 2020 --output-dir data")
                .arg(
                    Arg::new("start_year")
                        .short('s')
                        .long("start-year")
                        .help("First year whose monthly archives are requested")
                        .value_parser(clap::value_parser!(i32))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("active_only")
                        .short('a')
                        .long("active-only")
                        .help("Also write the active subset (true/false)")
                        .value_parser(clap::value_parser!(bool))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output-dir")
                        .help("Directory receiving tenders.ndjson and tenders-active.json")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("toml")
                .about("Run using a TOML configuration file")
                .arg(
                    Arg::new("config")
                        .help("Path to the TOML config file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

/// Applies `run` flags on top of an already resolved configuration.
fn apply_run_flags(config: &mut ResolvedConfig, sub: &ArgMatches) {
    if let Some(&year) = sub.get_one::<i32>("start_year") {
        config.start_year = year;
    }
    if let Some(&active_only) = sub.get_one::<bool>("active_only") {
        config.active_only = active_only;
    }
    if let Some(dir) = sub.get_one::<PathBuf>("output_dir") {
        config.output_dir = dir.clone();
    }
}

/// Parses command-line arguments and runs a synchronization.
///
/// Two subcommands resolve the configuration differently:
/// - `run`: defaults, then `LICITAI_*` environment variables, then flags
/// - `toml`: a TOML configuration file
///
/// Without a subcommand the help text is printed.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or an output artifact
/// cannot be written. Upstream feed problems never fail the run.
pub async fn cli() -> AppResult<()> {
    let cmd = build_command();
    let mut cmd_for_help = cmd.clone();
    let matches = cmd.get_matches();

    let config = match matches.subcommand() {
        Some(("run", sub)) => {
            let mut config = ResolvedConfig::from_env()?;
            apply_run_flags(&mut config, sub);
            config.validate()?;
            config
        }
        Some(("toml", sub)) => {
            let config_path = sub
                .get_one::<PathBuf>("config")
                .ok_or_else(|| AppError::InvalidInput("config path is required".into()))?;
            ResolvedConfig::from_toml_file(config_path)?
        }
        _ => {
            cmd_for_help
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
            return Ok(());
        }
    };

    let transport = HttpTransport::new(&config)?;
    let today = chrono::Local::now().date_naive();
    let report = run_sync(&transport, &config, today).await?;

    info!(
        periods = report.stats.periods_attempted,
        archives = report.stats.archives_found,
        failed = report.stats.archives_failed,
        probe_errors = report.stats.probe_errors,
        unique = report.unique_tenders,
        output_dir = %config.output_dir.display(),
        "All operations completed successfully"
    );

    Ok(())
}
