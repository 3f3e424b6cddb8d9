//! Command line front end: parse a statement, bootstrap the registry and
//! print a spending report.

pub mod output;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use once_cell::sync::Lazy;

use crate::config::{Config, ConfigManager};
use crate::core::services::SummaryService;
use crate::core::AppContext;
use crate::domain::query::TimeRange;
use crate::errors::{LedgerError, LedgerResult};
use crate::parser::{InternetbankenParser, StatementParser};
use crate::utils::build_info;

static LONG_VERSION: Lazy<String> = Lazy::new(build_info::long_version);

#[derive(Debug, Parser)]
#[command(
    name = "spendlog_cli",
    version,
    long_version = LONG_VERSION.as_str(),
    about = "Summarise spending from bank statement exports"
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable coloured output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a summary of the statement between two dates.
    Report(ReportArgs),
    /// Write the template counter-party config to a file.
    InitConfig {
        path: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// List every known alias and the counter party it resolves to.
    Aliases {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Statement exported from Internetbanken.
    #[arg(long)]
    pub statement: PathBuf,

    /// Counter-party config; falls back to the data directory, then the template.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// First day of the report (YYYY-MM-DD).
    #[arg(long)]
    pub from: NaiveDate,

    /// Last day of the report, inclusive.
    #[arg(long)]
    pub to: NaiveDate,

    /// Show capital change per tag, category and counter party.
    #[arg(long)]
    pub capital: bool,

    /// List every transaction in the range.
    #[arg(long)]
    pub all: bool,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Entry point used by the binary.
pub fn run_cli() -> LedgerResult<()> {
    let cli = Cli::parse();
    crate::init_with_verbosity(cli.verbose);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

pub fn run(cli: Cli, out: &mut impl Write) -> LedgerResult<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Command::Report(args) => report(&args, out),
        Command::InitConfig { path, force } => init_config(&path, force, out),
        Command::Aliases { config } => aliases(config.as_deref(), out),
    }
}

fn report(args: &ReportArgs, out: &mut impl Write) -> LedgerResult<()> {
    let range = TimeRange::from_dates(args.from, args.to)?;
    let config = load_config(args.config.as_deref())?;

    let mut context = AppContext::with_config(&config);
    let parsed = InternetbankenParser::new().parse_file(&args.statement)?;
    let summary = context.ingest(parsed);
    tracing::info!(
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        replaced = summary.replaced,
        "statement ingested"
    );

    let mut options = config.report;
    options.show_capital_change |= args.capital;
    options.show_all_transactions |= args.all;

    let report = SummaryService::report(&context, range, options);
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(out, "{}", output::render_report(&report))?;
    }
    Ok(())
}

fn init_config(path: &Path, force: bool, out: &mut impl Write) -> LedgerResult<()> {
    let manager = ConfigManager::new(path);
    if manager.exists() && !force {
        return Err(LedgerError::InvalidInput(format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        )));
    }
    manager.save(&Config::template())?;
    writeln!(out, "Wrote template config to {}", path.display())?;
    Ok(())
}

fn aliases(config: Option<&Path>, out: &mut impl Write) -> LedgerResult<()> {
    let context = AppContext::with_config(&load_config(config)?);
    write!(out, "{}", output::render_aliases(context.registry()))?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> LedgerResult<Config> {
    match path {
        Some(path) => {
            let manager = ConfigManager::new(path);
            if !manager.exists() {
                return Err(LedgerError::InvalidInput(format!(
                    "config file {} not found",
                    path.display()
                )));
            }
            manager.load()
        }
        None => {
            let manager = ConfigManager::default_location();
            if manager.exists() {
                manager.load()
            } else {
                tracing::debug!("no config file; using the template counter parties");
                Ok(Config::template())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_arguments() {
        let cli = Cli::try_parse_from([
            "spendlog_cli",
            "-vv",
            "report",
            "--statement",
            "march.txt",
            "--from",
            "2025-03-01",
            "--to",
            "2025-03-31",
            "--capital",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Report(args) => {
                assert_eq!(args.from, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
                assert!(args.capital);
                assert!(!args.all);
                assert!(args.config.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        let result = Cli::try_parse_from([
            "spendlog_cli",
            "report",
            "--statement",
            "march.txt",
            "--from",
            "03/01/2025",
            "--to",
            "2025-03-31",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
    }

    #[test]
    fn init_config_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut out = Vec::new();
        init_config(&path, false, &mut out).unwrap();
        assert!(init_config(&path, false, &mut out).is_err());
        init_config(&path, true, &mut out).unwrap();
        assert_eq!(ConfigManager::new(&path).load().unwrap(), Config::template());
    }
}
