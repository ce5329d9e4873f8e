//! CLI command for ledger export
//!
//! Writes the whole ledger as transaction CSV, JSON or YAML.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use super::CliContext;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{csv, json, yaml};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (spreadsheet-compatible)
    Csv,
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-readable)
    Yaml,
}

/// Arguments for `export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file path
    pub output: PathBuf,

    /// Export format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Handle the export command
pub fn handle_export_command(ctx: &CliContext, args: ExportArgs) -> LedgerResult<()> {
    let store = ctx.load_ledger()?;

    let file = File::create(&args.output).map_err(|e| {
        LedgerError::Export(format!(
            "Failed to create file {}: {}",
            args.output.display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);

    match args.format {
        ExportFormat::Csv => {
            csv::export_transactions_csv(store.all(), &mut writer)?;
        }
        ExportFormat::Json => json::export_ledger_json(&store, &mut writer, args.pretty)?,
        ExportFormat::Yaml => yaml::export_ledger_yaml(&store, &mut writer)?,
    }

    tracing::info!(path = %args.output.display(), format = ?args.format, "exported ledger");
    println!(
        "Exported {} transactions to: {}",
        store.len(),
        args.output.display()
    );

    Ok(())
}
