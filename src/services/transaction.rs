//! Transaction service
//!
//! Builds transactions from user input (Jalali dates, optional time of day)
//! and routes them through the ledger store's mutators.

use chrono::NaiveTime;

use crate::calendar::{CivilDate, DateRange, DateRangeResolver, RangeBound, RangeError};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Flow, Money, Transaction};
use crate::storage::LedgerStore;

/// Service for transaction management
pub struct TransactionService<'a> {
    store: &'a mut LedgerStore,
    resolver: DateRangeResolver,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only transactions inside this range
    pub range: Option<DateRange>,
    pub flow: Option<Flow>,
    pub category: Option<Category>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn flow(mut self, flow: Flow) -> Self {
        self.flow = Some(flow);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.range.as_ref().map_or(true, |r| r.contains(txn.timestamp))
            && self.flow.map_or(true, |f| txn.flow == f)
            && self.category.map_or(true, |c| txn.category == c)
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub flow: Flow,
    pub category: Category,
    pub amount: Money,
    /// Jalali calendar date
    pub date: CivilDate,
    /// Local wall-clock time; midnight when absent
    pub time: Option<NaiveTime>,
    pub description: String,
    pub source: Option<String>,
}

impl<'a> TransactionService<'a> {
    pub fn new(store: &'a mut LedgerStore, resolver: DateRangeResolver) -> Self {
        Self { store, resolver }
    }

    /// Create and store a new transaction
    pub fn create(&mut self, input: CreateTransactionInput) -> LedgerResult<Transaction> {
        let date = self.resolver.resolve_date(input.date).map_err(|source| {
            tracing::warn!(date = %input.date, error = %source, "rejected transaction date");
            LedgerError::InvalidDateInput(RangeError::Invalid {
                bound: RangeBound::Start,
                source,
            })
        })?;
        let timestamp = self
            .resolver
            .at_local_time(date, input.time.unwrap_or(NaiveTime::MIN));

        let mut txn = Transaction::new(
            input.flow,
            input.category,
            input.amount,
            timestamp,
            input.description.trim(),
        );
        if let Some(source) = input.source {
            txn = txn.with_source(source.trim());
        }

        let stored = self.store.add(txn)?;
        Ok(stored.clone())
    }

    /// Look up a transaction by a user-supplied identifier
    pub fn find(&self, identifier: &str) -> LedgerResult<&Transaction> {
        self.store.find(identifier)
    }

    /// List transactions newest first
    pub fn list(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        let mut listed: Vec<&Transaction> = self
            .store
            .recent(None)
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();
        if let Some(limit) = filter.limit {
            listed.truncate(limit);
        }
        listed
    }

    /// Delete a transaction by identifier
    pub fn delete(&mut self, identifier: &str) -> LedgerResult<Transaction> {
        let id = self.store.find(identifier)?.id;
        self.store.delete(id)
    }
}
