//! YAML export
//!
//! Same documents as the JSON exports, with a comment header for people
//! reading the file.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::export::json::{LedgerExport, ReportExport};
use crate::storage::LedgerStore;

fn write_header<W: Write>(writer: &mut W, title: &str, lines: &[String]) -> LedgerResult<()> {
    let export_err = |e: std::io::Error| LedgerError::Export(e.to_string());

    writeln!(writer, "# {}", title).map_err(export_err)?;
    for line in lines {
        writeln!(writer, "# {}", line).map_err(export_err)?;
    }
    writeln!(writer).map_err(export_err)
}

/// Export the ledger to YAML
pub fn export_ledger_yaml<W: Write>(store: &LedgerStore, writer: &mut W) -> LedgerResult<()> {
    let export = LedgerExport::from_store(store);

    write_header(
        writer,
        "Charity Ledger Export",
        &[
            format!("Generated: {}", export.exported_at),
            format!("App Version: {}", export.app_version),
            format!("Transactions: {}", export.metadata.transaction_count),
        ],
    )?;

    serde_yaml::to_writer(writer, &export).map_err(|e| LedgerError::Export(e.to_string()))
}

/// Parse and validate a YAML ledger export
pub fn import_ledger_yaml(yaml_str: &str) -> LedgerResult<LedgerExport> {
    let export: LedgerExport =
        serde_yaml::from_str(yaml_str).map_err(|e| LedgerError::Import(e.to_string()))?;
    export.validate().map_err(LedgerError::Import)?;
    Ok(export)
}

/// Write a report as YAML
pub fn export_report_yaml<W: Write>(export: &ReportExport<'_>, writer: &mut W) -> LedgerResult<()> {
    write_header(
        writer,
        "Charity Ledger Report",
        &[
            format!(
                "Period: {} to {}",
                export.report.first_day, export.report.last_day
            ),
            format!("Generated: {}", export.exported_at),
        ],
    )?;

    serde_yaml::to_writer(writer, export).map_err(|e| LedgerError::Export(e.to_string()))
}
