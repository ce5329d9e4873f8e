//! Transaction CLI commands
//!
//! Implements CLI commands for recording, listing and removing ledger entries.

use chrono::NaiveTime;
use clap::Subcommand;

use super::{parse_money_arg, resolve_period, CliContext};
use crate::calendar::CivilDate;
use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Flow};
use crate::services::{CreateTransactionInput, TransactionFilter, TransactionService};

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// Category (e.g. "bread", "SHOP_RENTAL" or the Persian label)
        category: Category,
        /// Amount in rials (e.g. "750000" or "750,000")
        amount: String,
        /// Description
        description: String,
        /// Flow (income/expense); inferred from the category when omitted
        #[arg(short, long)]
        flow: Option<Flow>,
        /// Jalali date (YYYY/MM/DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Local time of day (HH:MM), defaults to midnight
        #[arg(short, long)]
        time: Option<String>,
        /// Donor, tenant or other source of the money
        #[arg(short, long)]
        source: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Start date (YYYY/MM/DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY/MM/DD)
        #[arg(long)]
        to: Option<String>,
        /// Only income or only expense
        #[arg(short, long)]
        flow: Option<Flow>,
        /// Only one category
        #[arg(short = 'C', long)]
        category: Option<Category>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID (or a unique prefix of at least 8 characters)
        id: String,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID (or a unique prefix of at least 8 characters)
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(ctx: &CliContext, cmd: TransactionCommands) -> LedgerResult<()> {
    let mut store = ctx.load_ledger()?;

    match cmd {
        TransactionCommands::Add {
            category,
            amount,
            description,
            flow,
            date,
            time,
            source,
        } => {
            let amount = parse_money_arg("amount", &amount)?;

            let date: CivilDate = match date {
                Some(date_str) => date_str.parse().map_err(|e| {
                    LedgerError::Validation(format!(
                        "Invalid date '{}': {}. Use YYYY/MM/DD (e.g. 1404/07/09)",
                        date_str, e
                    ))
                })?,
                None => ctx
                    .resolver
                    .today()
                    .map_err(|e| LedgerError::Validation(e.to_string()))?
                    .into(),
            };

            let time = time
                .map(|t| {
                    NaiveTime::parse_from_str(&t, "%H:%M").map_err(|_| {
                        LedgerError::Validation(format!("Invalid time '{}'. Use HH:MM", t))
                    })
                })
                .transpose()?;

            let input = CreateTransactionInput {
                flow: flow.unwrap_or_else(|| category.flow()),
                category,
                amount,
                date,
                time,
                description,
                source,
            };

            let txn = TransactionService::new(&mut store, ctx.resolver).create(input)?;
            ctx.save_ledger(&store)?;

            println!("Recorded transaction:");
            print!("{}", format_transaction_details(&txn, &ctx.resolver));
        }
        TransactionCommands::List {
            from,
            to,
            flow,
            category,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if from.is_some() || to.is_some() {
                filter = filter.range(resolve_period(
                    &ctx.resolver,
                    from.as_deref(),
                    to.as_deref(),
                )?);
            }
            if let Some(flow) = flow {
                filter = filter.flow(flow);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }

            let service = TransactionService::new(&mut store, ctx.resolver);
            let transactions = service.list(&filter);
            print!("{}", format_transaction_register(&transactions, &ctx.resolver));
            println!("\nShowing {} transactions", transactions.len());
        }
        TransactionCommands::Show { id } => {
            let service = TransactionService::new(&mut store, ctx.resolver);
            let txn = service.find(&id)?;
            print!("{}", format_transaction_details(txn, &ctx.resolver));
        }
        TransactionCommands::Delete { id } => {
            let removed = TransactionService::new(&mut store, ctx.resolver).delete(&id)?;
            ctx.save_ledger(&store)?;

            println!(
                "Deleted transaction {} ({}, {})",
                removed.id, removed.category, removed.amount
            );
        }
    }

    Ok(())
}
