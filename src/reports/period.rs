//! Period Report
//!
//! The aggregator behind every report: filters the ledger to a resolved
//! [`DateRange`], totals inflows and outflows, and builds a month-by-month
//! series with a running balance seeded by an opening balance.

use std::io::Write;

use serde::Serialize;

use crate::calendar::{DateRange, JalaliDate, JalaliMonth};
use crate::display::report::{format_net_bar, separator};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Flow, Money, Transaction};

/// Totals for one calendar month of the range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub month: JalaliMonth,
    /// Display label, e.g. "Mehr 1404"
    pub label: String,
    pub income: Money,
    pub expense: Money,
    /// Balance after this month's income and expense
    pub running_balance: Money,
}

impl MonthBucket {
    fn empty(month: JalaliMonth) -> Self {
        Self {
            month,
            label: month.label(),
            income: Money::zero(),
            expense: Money::zero(),
            running_balance: Money::zero(),
        }
    }

    /// Income minus expense for the month
    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

/// Aggregate of the ledger over one date range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReport {
    #[serde(skip)]
    range: DateRange,
    pub first_day: JalaliDate,
    pub last_day: JalaliDate,
    pub opening_balance: Money,
    pub total_income: Money,
    pub total_expense: Money,
    pub closing_balance: Money,
    /// One bucket per month from the first day's month to the last day's,
    /// including months without transactions
    pub months: Vec<MonthBucket>,
    /// Transactions inside the range, oldest first
    pub transactions: Vec<Transaction>,
}

impl PeriodReport {
    /// Aggregate `transactions` over `range`
    ///
    /// Pure: the same inputs always produce the same report. A transaction is
    /// bucketed by the month of its timestamp in the range's local offset.
    pub fn generate(transactions: &[Transaction], range: &DateRange, opening_balance: Money) -> Self {
        let mut filtered: Vec<Transaction> = transactions
            .iter()
            .filter(|t| range.contains(t.timestamp))
            .cloned()
            .collect();
        filtered.sort_by_key(|t| t.timestamp);

        let mut months: Vec<MonthBucket> =
            range.months().into_iter().map(MonthBucket::empty).collect();
        let mut total_income = Money::zero();
        let mut total_expense = Money::zero();

        for txn in &filtered {
            match txn.flow {
                Flow::Income => total_income += txn.amount,
                Flow::Expense => total_expense += txn.amount,
            }

            let Some(month) = range.month_of(txn.timestamp) else {
                continue;
            };
            let Some(bucket) = months.iter_mut().find(|b| b.month == month) else {
                continue;
            };
            match txn.flow {
                Flow::Income => bucket.income += txn.amount,
                Flow::Expense => bucket.expense += txn.amount,
            }
        }

        let mut balance = opening_balance;
        for bucket in &mut months {
            balance += bucket.net();
            bucket.running_balance = balance;
        }

        let closing_balance = opening_balance + total_income - total_expense;
        tracing::debug!(
            range = %range,
            matched = filtered.len(),
            of = transactions.len(),
            income = %total_income,
            expense = %total_expense,
            "aggregated period"
        );

        Self {
            range: range.clone(),
            first_day: range.first_day(),
            last_day: range.last_day(),
            opening_balance,
            total_income,
            total_expense,
            closing_balance,
            months,
            transactions: filtered,
        }
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    /// Income minus expense over the period
    pub fn net(&self) -> Money {
        self.total_income - self.total_expense
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_label: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Financial Report: {} to {}\n",
            self.first_day, self.last_day
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "Opening Balance: {}\n",
            self.opening_balance.format_with_label(currency_label)
        ));
        output.push_str(&format!(
            "Total Income:    {}\n",
            self.total_income.format_with_label(currency_label)
        ));
        output.push_str(&format!(
            "Total Expense:   {}\n",
            self.total_expense.format_with_label(currency_label)
        ));
        output.push_str(&format!(
            "Closing Balance: {}\n",
            self.closing_balance.format_with_label(currency_label)
        ));
        output.push_str(&format!("Transactions:    {}\n\n", self.transaction_count()));

        output.push_str(&format!(
            "{:<16} {:>14} {:>14} {:>16}  {}\n",
            "Month", "Income", "Expense", "Balance", "Net"
        ));
        output.push_str(&separator(80));
        output.push('\n');

        let widest = self
            .months
            .iter()
            .map(|b| b.net().abs())
            .max()
            .unwrap_or_default();

        for bucket in &self.months {
            output.push_str(&format!(
                "{:<16} {:>14} {:>14} {:>16}  {}\n",
                bucket.label,
                bucket.income,
                bucket.expense,
                bucket.running_balance,
                format_net_bar(bucket.net(), widest, 12)
            ));
        }

        output.push_str(&separator(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:>14} {:>14} {:>16}\n",
            "TOTAL", self.total_income, self.total_expense, self.closing_balance
        ));

        if self.is_empty() {
            output.push_str("\nNo transactions in this period.\n");
        }

        output
    }

    /// Export the monthly series to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer
            .write_record(["Month", "Label", "Income", "Expense", "Running Balance"])
            .map_err(|e| LedgerError::Export(e.to_string()))?;

        for bucket in &self.months {
            csv_writer
                .write_record([
                    bucket.month.to_string(),
                    bucket.label.clone(),
                    bucket.income.minor().to_string(),
                    bucket.expense.minor().to_string(),
                    bucket.running_balance.minor().to_string(),
                ])
                .map_err(|e| LedgerError::Export(e.to_string()))?;
        }

        csv_writer
            .write_record([
                "TOTAL".to_string(),
                format!("{}..{}", self.first_day, self.last_day),
                self.total_income.minor().to_string(),
                self.total_expense.minor().to_string(),
                self.closing_balance.minor().to_string(),
            ])
            .map_err(|e| LedgerError::Export(e.to_string()))?;

        csv_writer
            .flush()
            .map_err(|e| LedgerError::Export(e.to_string()))?;

        Ok(())
    }
}
