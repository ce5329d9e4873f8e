use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use charity_ledger::cli::{
    handle_config_command, handle_date_command, handle_export_command, handle_import_command,
    handle_init_command, handle_report_command, handle_summary_command,
    handle_transaction_command, CliContext, DateCommands, ExportArgs, ImportArgs, ReportArgs,
    TransactionCommands,
};
use charity_ledger::config::LedgerPaths;

#[derive(Parser)]
#[command(
    name = "charity",
    version,
    about = "Bookkeeping and solar Hijri period reports for a small charity",
    long_about = "Records income and expense transactions for a charity and produces \
                  period reports over Jalali date ranges: monthly totals with a running \
                  balance, a balance statement with optional manual totals, and a prompt \
                  for narrative analysis."
)]
struct Cli {
    /// Use this ledger file instead of the one in the data directory
    #[arg(long, global = true, env = "CHARITY_LEDGER_FILE")]
    ledger: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create settings and an empty ledger
    Init {
        /// Seed a new ledger with sample transactions
        #[arg(long)]
        sample: bool,
    },

    /// Show current configuration and paths
    Config,

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// All-time totals
    Summary,

    /// Period report for a Jalali date range
    Report(ReportArgs),

    /// Import transactions from a file
    Import(ImportArgs),

    /// Export the ledger to a file
    Export(ExportArgs),

    /// Convert between the Jalali and Gregorian calendars
    #[command(subcommand)]
    Date(DateCommands),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    init_logger(level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut paths = LedgerPaths::new()?;
    if let Some(ledger) = cli.ledger {
        paths = paths.with_ledger_file(ledger);
    }
    debug!(base = %paths.base_dir().display(), ledger = %paths.ledger_file().display(), "resolved paths");

    // Settings are only read once init has had a chance to create them
    let context = || CliContext::load(paths.clone());
    match cli.command {
        Commands::Init { sample } => handle_init_command(&paths, sample)?,
        Commands::Config => handle_config_command(&context()?)?,
        Commands::Transaction(cmd) => handle_transaction_command(&context()?, cmd)?,
        Commands::Summary => handle_summary_command(&context()?)?,
        Commands::Report(args) => handle_report_command(&context()?, args)?,
        Commands::Import(args) => handle_import_command(&context()?, args)?,
        Commands::Export(args) => handle_export_command(&context()?, args)?,
        Commands::Date(cmd) => handle_date_command(&context()?, cmd)?,
    }

    Ok(())
}

/// Initializes the tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise only this package's crates log, at
/// `level`.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "{}={},{}={}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
            level,
            env!("CARGO_CRATE_NAME"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
