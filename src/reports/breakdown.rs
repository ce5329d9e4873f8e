//! Category Breakdown
//!
//! Per-category totals for the transactions of a period, split by flow.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::display::report::{format_bar, format_percentage, separator};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Flow, Money, Transaction};

/// Totals for a single category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub total: Money,
    pub transaction_count: usize,
    /// Share of the flow's total, 0-100
    pub percentage: f64,
}

/// All categories of one flow, largest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowBreakdown {
    pub flow: Flow,
    pub total: Money,
    pub categories: Vec<CategoryShare>,
}

impl FlowBreakdown {
    fn build(flow: Flow, transactions: &[Transaction]) -> Self {
        let mut by_category: BTreeMap<Category, (Money, usize)> = BTreeMap::new();
        for txn in transactions.iter().filter(|t| t.flow == flow) {
            let entry = by_category.entry(txn.category).or_insert((Money::zero(), 0));
            entry.0 += txn.amount;
            entry.1 += 1;
        }

        let total: Money = by_category.values().map(|(amount, _)| *amount).sum();
        let mut categories: Vec<CategoryShare> = by_category
            .into_iter()
            .map(|(category, (amount, count))| CategoryShare {
                category,
                total: amount,
                transaction_count: count,
                percentage: if total.is_zero() {
                    0.0
                } else {
                    amount.minor() as f64 / total.minor() as f64 * 100.0
                },
            })
            .collect();

        // Largest first; ties keep category order
        categories.sort_by(|a, b| b.total.cmp(&a.total));

        Self {
            flow,
            total,
            categories,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Share for one category, if it had any transactions
    pub fn get(&self, category: Category) -> Option<&CategoryShare> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Income and expense breakdown for a set of transactions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub income: FlowBreakdown,
    pub expense: FlowBreakdown,
}

impl CategoryBreakdown {
    /// Break down already-filtered transactions (e.g. a period report's)
    pub fn generate(transactions: &[Transaction]) -> Self {
        Self {
            income: FlowBreakdown::build(Flow::Income, transactions),
            expense: FlowBreakdown::build(Flow::Expense, transactions),
        }
    }

    pub fn flow(&self, flow: Flow) -> &FlowBreakdown {
        match flow {
            Flow::Income => &self.income,
            Flow::Expense => &self.expense,
        }
    }

    /// Format the breakdown for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        for breakdown in [&self.income, &self.expense] {
            output.push_str(&format!(
                "{} by Category ({})\n",
                breakdown.flow, breakdown.total
            ));
            output.push_str(&separator(72));
            output.push('\n');

            if breakdown.is_empty() {
                output.push_str("  (none)\n\n");
                continue;
            }

            let largest = breakdown
                .categories
                .first()
                .map(|c| c.total)
                .unwrap_or_default();
            for share in &breakdown.categories {
                output.push_str(&format!(
                    "  {:<20} {:>14} {:>4} {:>6}  {}\n",
                    share.category,
                    share.total,
                    share.transaction_count,
                    format_percentage(share.percentage),
                    format_bar(share.total, largest, 16)
                ));
            }
            output.push('\n');
        }

        output
    }

    /// Export the breakdown to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LedgerResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer
            .write_record(["Flow", "Category", "Amount", "Transaction Count", "Percentage"])
            .map_err(|e| LedgerError::Export(e.to_string()))?;

        for breakdown in [&self.income, &self.expense] {
            for share in &breakdown.categories {
                csv_writer
                    .write_record([
                        breakdown.flow.code().to_string(),
                        share.category.code().to_string(),
                        share.total.minor().to_string(),
                        share.transaction_count.to_string(),
                        format!("{:.2}", share.percentage),
                    ])
                    .map_err(|e| LedgerError::Export(e.to_string()))?;
            }
        }

        csv_writer
            .flush()
            .map_err(|e| LedgerError::Export(e.to_string()))?;
        Ok(())
    }
}
