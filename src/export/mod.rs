//! Export module for the charity ledger
//!
//! - CSV: transactions in a spreadsheet-friendly layout, importable again
//! - JSON: machine-readable ledger and report exports
//! - YAML: human-readable ledger and report exports

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_transactions_csv, import_transactions, read_transactions_csv};
pub use json::{
    export_ledger_json, import_ledger_json, ExportMetadata, LedgerExport, ReportExport,
    EXPORT_SCHEMA_VERSION,
};
pub use yaml::{export_ledger_yaml, export_report_yaml, import_ledger_yaml};
