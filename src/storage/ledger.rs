//! The ledger store
//!
//! Owns every transaction. `add` and `delete` are the only mutators; all
//! other consumers borrow the store or a slice of its transactions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Flow, Money, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

const SNAPSHOT_VERSION: u32 = 1;

/// Ceiling on the sum of every amount in the ledger
///
/// With amounts, opening balances and overrides each capped at
/// [`Money::MAX_AMOUNT`], no total or running balance can leave `i64`.
pub const MAX_LEDGER_TURNOVER: Money = Money::from_minor(i64::MAX / 4);

/// On-disk shape of the ledger snapshot
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerSnapshot {
    #[serde(default = "snapshot_version")]
    schema_version: u32,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

fn snapshot_version() -> u32 {
    SNAPSHOT_VERSION
}

/// All-time totals over the whole ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    pub count: usize,
    pub income: Money,
    pub expense: Money,
    pub balance: Money,
}

/// In-memory transaction store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerStore {
    transactions: Vec<Transaction>,
}

impl LedgerStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing transactions, validating each one
    pub fn from_transactions<I>(transactions: I) -> LedgerResult<Self>
    where
        I: IntoIterator<Item = Transaction>,
    {
        let mut store = Self::new();
        for txn in transactions {
            store.insert(txn)?;
        }
        Ok(store)
    }

    /// Load a snapshot file; a missing file is an empty ledger
    pub fn load(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        let snapshot: LedgerSnapshot = read_json(path)?;
        if snapshot.schema_version > SNAPSHOT_VERSION {
            return Err(LedgerError::Config(format!(
                "{} was written by a newer version (schema {})",
                path.display(),
                snapshot.schema_version
            )));
        }

        let store = Self::from_transactions(snapshot.transactions)?;
        tracing::debug!(path = %path.display(), count = store.len(), "loaded ledger");
        Ok(store)
    }

    /// Write the snapshot file atomically
    pub fn save(&self, path: impl AsRef<Path>) -> LedgerResult<()> {
        let path = path.as_ref();
        let snapshot = LedgerSnapshot {
            schema_version: SNAPSHOT_VERSION,
            transactions: self.transactions.clone(),
        };
        write_json_atomic(path, &snapshot)?;
        tracing::debug!(path = %path.display(), count = self.len(), "saved ledger");
        Ok(())
    }

    /// Add a transaction
    ///
    /// Rejects non-positive amounts, blank descriptions, a category from the
    /// other flow, an ID already in the store, and an amount that would take
    /// the ledger past [`MAX_LEDGER_TURNOVER`].
    pub fn add(&mut self, txn: Transaction) -> LedgerResult<&Transaction> {
        let id = txn.id;
        self.insert(txn)?;
        tracing::info!(%id, "added transaction");
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    fn insert(&mut self, txn: Transaction) -> LedgerResult<()> {
        txn.validate()
            .map_err(|e| LedgerError::Validation(format!("{}: {}", txn.id, e)))?;

        if self.get(txn.id).is_some() {
            return Err(LedgerError::duplicate_transaction(txn.id.to_string()));
        }

        let turnover = self
            .transactions
            .iter()
            .try_fold(txn.amount, |total, t| total.checked_add(t.amount));
        if !turnover.is_some_and(|total| total <= MAX_LEDGER_TURNOVER) {
            return Err(LedgerError::Validation(format!(
                "{}: ledger totals would exceed {}",
                txn.id, MAX_LEDGER_TURNOVER
            )));
        }

        self.transactions.push(txn);
        Ok(())
    }

    /// Remove a transaction by ID
    pub fn delete(&mut self, id: TransactionId) -> LedgerResult<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

        let removed = self.transactions.remove(index);
        tracing::info!(%id, "deleted transaction");
        Ok(removed)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Look up a transaction by a user-supplied identifier
    ///
    /// Accepts the short `txn-xxxxxxxx` form; an identifier matching more
    /// than one transaction is rejected.
    pub fn find(&self, identifier: &str) -> LedgerResult<&Transaction> {
        let mut matches = self.transactions.iter().filter(|t| t.id.matches(identifier));
        let found = matches
            .next()
            .ok_or_else(|| LedgerError::transaction_not_found(identifier))?;

        if matches.next().is_some() {
            return Err(LedgerError::Validation(format!(
                "'{}' matches more than one transaction; use a longer ID",
                identifier
            )));
        }
        Ok(found)
    }

    /// All transactions in insertion order
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Transactions newest first, optionally limited
    pub fn recent(&self, limit: Option<usize>) -> Vec<&Transaction> {
        let mut newest: Vec<&Transaction> = self.transactions.iter().collect();
        newest.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = limit {
            newest.truncate(limit);
        }
        newest
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// All-time totals
    pub fn totals(&self) -> LedgerTotals {
        let sum = |flow: Flow| -> Money {
            self.transactions
                .iter()
                .filter(|t| t.flow == flow)
                .map(|t| t.amount)
                .sum()
        };
        let income = sum(Flow::Income);
        let expense = sum(Flow::Expense);

        LedgerTotals {
            count: self.transactions.len(),
            income,
            expense,
            balance: income - expense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::TempDir;

    fn txn(flow: Flow, category: Category, amount: i64, day: u32) -> Transaction {
        Transaction::new(
            flow,
            category,
            Money::from_minor(amount),
            Utc.with_ymd_and_hms(2025, 10, day, 9, 0, 0).unwrap(),
            "test entry",
        )
    }

    fn populated() -> LedgerStore {
        LedgerStore::from_transactions(vec![
            txn(Flow::Income, Category::CompanyContribution, 15_000_000, 1),
            txn(Flow::Expense, Category::Groceries, 3_500_000, 5),
            txn(Flow::Income, Category::DirectDonation, 500_000, 3),
        ])
        .unwrap()
    }

    #[test]
    fn test_add_and_get() {
        let mut store = LedgerStore::new();
        let t = txn(Flow::Income, Category::ShopRental, 2_000_000, 3);
        let id = t.id;

        store.add(t).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().amount, Money::from_minor(2_000_000));
    }

    #[test]
    fn test_add_rejects_invalid() {
        let mut store = LedgerStore::new();

        let err = store
            .add(txn(Flow::Income, Category::ShopRental, 0, 3))
            .unwrap_err();
        assert!(err.is_validation());

        let err = store
            .add(txn(Flow::Expense, Category::ShopRental, 100, 3))
            .unwrap_err();
        assert!(err.is_validation());

        assert!(store.is_empty());
    }

    #[test]
    fn test_add_rejects_amounts_that_would_overflow_totals() {
        let mut store = LedgerStore::new();
        let err = store
            .add(txn(Flow::Income, Category::ShopRental, i64::MAX / 2 + 1, 3))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.is_empty());

        let err = loop {
            let t = txn(Flow::Income, Category::ShopRental, Money::MAX_AMOUNT.minor(), 3);
            if let Err(e) = store.add(t) {
                break e;
            }
        };
        assert!(err.to_string().contains("ledger totals would exceed"));

        let totals = store.totals();
        assert!(totals.income <= MAX_LEDGER_TURNOVER);
        assert_eq!(totals.income.minor(), Money::MAX_AMOUNT.minor() * store.len() as i64);

        let range = crate::calendar::DateRangeResolver::default()
            .resolve(
                crate::calendar::CivilDate::new(1404, 7, 1),
                crate::calendar::CivilDate::new(1404, 7, 30),
            )
            .unwrap();
        let report = crate::reports::PeriodReport::generate(store.all(), &range, -Money::MAX_AMOUNT);
        assert_eq!(report.total_income, totals.income);
        assert_eq!(report.closing_balance, totals.income - Money::MAX_AMOUNT);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut store = LedgerStore::new();
        let t = txn(Flow::Income, Category::ShopRental, 100, 3);
        store.add(t.clone()).unwrap();

        let err = store.add(t).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateTransaction(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete() {
        let mut store = populated();
        let id = store.all()[1].id;

        let removed = store.delete(id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(store.len(), 2);
        assert!(store.get(id).is_none());

        assert!(store.delete(id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_by_short_id() {
        let store = populated();
        let target = &store.all()[2];

        assert_eq!(store.find(&target.id.to_string()).unwrap().id, target.id);
        assert!(store.find("txn-zzzzzzzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_recent_is_newest_first() {
        let store = populated();
        let days: Vec<u32> = store
            .recent(None)
            .iter()
            .map(|t| chrono::Datelike::day(&t.timestamp))
            .collect();
        assert_eq!(days, vec![5, 3, 1]);

        assert_eq!(store.recent(Some(1)).len(), 1);
    }

    #[test]
    fn test_recent_keeps_insertion_order_for_ties() {
        let at = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
        let mut first = txn(Flow::Income, Category::ShopRental, 1, 1);
        let mut second = txn(Flow::Income, Category::ShopRental, 2, 1);
        first.timestamp = at;
        second.timestamp = at;
        let mut older = txn(Flow::Income, Category::ShopRental, 3, 1);
        older.timestamp = at - Duration::days(1);

        let store = LedgerStore::from_transactions(vec![first, second, older]).unwrap();
        let amounts: Vec<i64> = store.recent(None).iter().map(|t| t.amount.minor()).collect();
        assert_eq!(amounts, vec![1, 2, 3]);
    }

    #[test]
    fn test_totals() {
        let totals = populated().totals();
        assert_eq!(totals.count, 3);
        assert_eq!(totals.income, Money::from_minor(15_500_000));
        assert_eq!(totals.expense, Money::from_minor(3_500_000));
        assert_eq!(totals.balance, Money::from_minor(12_000_000));

        assert_eq!(LedgerStore::new().totals(), LedgerTotals::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");

        let store = populated();
        store.save(&path).unwrap();

        let loaded = LedgerStore::load(&path).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = LedgerStore::load(temp_dir.path().join("none.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_rejects_invalid_snapshot_entry() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.json");
        std::fs::write(
            &path,
            r#"{"transactions": [{
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "flow": "INCOME",
                "category": "BREAD",
                "amount": 100,
                "date": "2025-10-01T09:00:00Z",
                "description": "mismatched"
            }]}"#,
        )
        .unwrap();

        assert!(LedgerStore::load(&path).unwrap_err().is_validation());
    }
}
