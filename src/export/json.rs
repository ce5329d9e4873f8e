//! JSON export
//!
//! Full ledger exports with schema versioning, and report exports carrying
//! the period aggregate, statement and category breakdown.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Transaction};
use crate::reports::{BalanceStatement, CategoryBreakdown, PeriodReport};
use crate::storage::LedgerStore;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Whole-ledger export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub transactions: Vec<Transaction>,

    pub metadata: ExportMetadata,
}

/// Summary figures written alongside the transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,
    pub total_income: Money,
    pub total_expense: Money,
    pub earliest_transaction: Option<DateTime<Utc>>,
    pub latest_transaction: Option<DateTime<Utc>>,
}

impl LedgerExport {
    /// Snapshot the store
    pub fn from_store(store: &LedgerStore) -> Self {
        let transactions = store.all().to_vec();
        let totals = store.totals();

        let metadata = ExportMetadata {
            transaction_count: totals.count,
            total_income: totals.income,
            total_expense: totals.expense,
            earliest_transaction: transactions.iter().map(|t| t.timestamp).min(),
            latest_transaction: transactions.iter().map(|t| t.timestamp).max(),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            transactions,
            metadata,
        }
    }

    /// Check version, per-transaction rules and ID uniqueness
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let mut seen = HashSet::new();
        for txn in &self.transactions {
            txn.validate().map_err(|e| format!("{}: {}", txn.id, e))?;
            if !seen.insert(txn.id) {
                return Err(format!("Transaction {} appears more than once", txn.id));
            }
        }

        Ok(())
    }

    /// Add every exported transaction to the store, or none of them
    pub fn merge_into(self, store: &mut LedgerStore) -> LedgerResult<usize> {
        let mut staged = store.clone();
        let count = self.transactions.len();
        for txn in self.transactions {
            staged
                .add(txn)
                .map_err(|e| LedgerError::Import(e.to_string()))?;
        }

        *store = staged;
        tracing::info!(count, "imported transactions");
        Ok(count)
    }
}

/// Export the ledger to JSON
pub fn export_ledger_json<W: Write>(
    store: &LedgerStore,
    writer: &mut W,
    pretty: bool,
) -> LedgerResult<()> {
    let export = LedgerExport::from_store(store);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON ledger export
pub fn import_ledger_json(json_str: &str) -> LedgerResult<LedgerExport> {
    let export: LedgerExport =
        serde_json::from_str(json_str).map_err(|e| LedgerError::Import(e.to_string()))?;
    export.validate().map_err(LedgerError::Import)?;
    Ok(export)
}

/// A generated report, ready to serialize
#[derive(Debug, Serialize)]
pub struct ReportExport<'a> {
    pub schema_version: &'static str,
    pub exported_at: DateTime<Utc>,
    pub currency_label: &'a str,
    pub report: &'a PeriodReport,
    pub statement: &'a BalanceStatement,
    pub breakdown: CategoryBreakdown,
}

impl<'a> ReportExport<'a> {
    pub fn new(
        report: &'a PeriodReport,
        statement: &'a BalanceStatement,
        currency_label: &'a str,
    ) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            currency_label,
            report,
            statement,
            breakdown: CategoryBreakdown::generate(&report.transactions),
        }
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json<W: Write>(&self, writer: &mut W) -> LedgerResult<()> {
        serde_json::to_writer_pretty(writer, self).map_err(|e| LedgerError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CivilDate, DateRangeResolver};
    use crate::reports::TotalOverrides;
    use crate::storage::sample_transactions_list;

    fn sample_store() -> LedgerStore {
        LedgerStore::from_transactions(sample_transactions_list().unwrap()).unwrap()
    }

    #[test]
    fn test_ledger_export_metadata() {
        let export = LedgerExport::from_store(&sample_store());

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.transaction_count, 7);
        assert_eq!(export.metadata.total_income, Money::from_minor(17_500_000));
        assert!(export.metadata.earliest_transaction <= export.metadata.latest_transaction);
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_export_and_import() {
        let store = sample_store();
        let mut buffer = Vec::new();
        export_ledger_json(&store, &mut buffer, true).unwrap();

        let json = String::from_utf8(buffer).unwrap();
        assert!(json.contains("\"category\": \"SHOP_RENTAL\""));
        assert!(json.contains("\"flow\": \"EXPENSE\""));

        let imported = import_ledger_json(&json).unwrap();
        let mut restored = LedgerStore::new();
        assert_eq!(imported.merge_into(&mut restored).unwrap(), 7);
        assert_eq!(restored, store);
    }

    #[test]
    fn test_import_rejects_bad_exports() {
        let mut export = LedgerExport::from_store(&sample_store());
        export.schema_version = "0.1.0".into();
        let json = serde_json::to_string(&export).unwrap();
        assert!(matches!(import_ledger_json(&json), Err(LedgerError::Import(_))));

        let mut export = LedgerExport::from_store(&sample_store());
        let first = export.transactions[0].clone();
        export.transactions.push(first);
        assert!(export.validate().unwrap_err().contains("more than once"));

        assert!(import_ledger_json("not json").is_err());
    }

    #[test]
    fn test_merge_is_all_or_nothing() {
        let mut store = sample_store();
        let export = LedgerExport::from_store(&store);

        // Every id already exists
        assert!(export.merge_into(&mut store).is_err());
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn test_report_export() {
        let range = DateRangeResolver::default()
            .resolve(CivilDate::new(1404, 7, 1), CivilDate::new(1404, 7, 30))
            .unwrap();
        let report = PeriodReport::generate(&sample_transactions_list().unwrap(), &range, Money::zero());
        let statement = BalanceStatement::generate(&report, TotalOverrides::default()).unwrap();

        let mut buffer = Vec::new();
        ReportExport::new(&report, &statement, "IRR")
            .write_json(&mut buffer)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["currency_label"], "IRR");
        assert_eq!(value["report"]["total_income"], 17_500_000);
        assert_eq!(value["report"]["months"].as_array().unwrap().len(), 1);
        assert_eq!(value["statement"]["closing_balance"], 7_050_000);
        assert_eq!(value["breakdown"]["expense"]["categories"][0]["category"], "ANIMAL_SACRIFICE");
    }
}
