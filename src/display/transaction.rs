//! Transaction display formatting
//!
//! Register tables and detail views. Dates are shown in the Jalali calendar
//! in the configured local offset.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::report::truncate;
use crate::calendar::DateRangeResolver;
use crate::models::{Flow, Transaction};

#[derive(Tabled)]
struct RegisterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Flow")]
    flow: &'static str,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Local Jalali date and time of a transaction, e.g. "1404/07/09 12:30"
pub fn format_local_timestamp(txn: &Transaction, resolver: &DateRangeResolver) -> String {
    let local_time = txn.timestamp.with_timezone(&resolver.offset()).format("%H:%M");
    match resolver.local_date(txn.timestamp) {
        Ok(date) => format!("{} {}", date, local_time),
        Err(_) => txn.timestamp.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
}

/// Format a list of transactions as a register table
pub fn format_transaction_register(
    transactions: &[&Transaction],
    resolver: &DateRangeResolver,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions.iter().map(|txn| RegisterRow {
        id: txn.id.to_string(),
        date: format_local_timestamp(txn, resolver),
        flow: match txn.flow {
            Flow::Income => "In",
            Flow::Expense => "Out",
        },
        category: txn.category.to_string(),
        description: truncate(&txn.description, 32),
        amount: txn.signed_amount().to_string(),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::single(5)).with(Alignment::right()));

    format!("{}\n", table)
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, resolver: &DateRangeResolver) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!(
        "Date:        {}\n",
        format_local_timestamp(txn, resolver)
    ));
    output.push_str(&format!("Flow:        {} ({})\n", txn.flow, txn.flow.persian_label()));
    output.push_str(&format!(
        "Category:    {} ({})\n",
        txn.category,
        txn.category.persian_label()
    ));
    output.push_str(&format!("Amount:      {}\n", txn.amount));
    output.push_str(&format!("Description: {}\n", txn.description));

    if let Some(source) = &txn.source {
        output.push_str(&format!("Source:      {}\n", source));
    }

    output
}
