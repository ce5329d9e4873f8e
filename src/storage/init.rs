//! Storage initialization
//!
//! Handles first-run setup and the optional sample ledger

use chrono::{DateTime, TimeZone, Utc};

use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Flow, Money, Transaction};

use super::ledger::LedgerStore;

/// Outcome of [`initialize_storage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitReport {
    pub settings_created: bool,
    pub ledger_created: bool,
    pub sample_transactions: usize,
}

/// Initialize storage for a fresh installation
///
/// Writes default settings and an empty ledger when they are missing. With
/// `with_sample`, a new ledger is seeded with a week of example entries.
/// Existing files are never overwritten.
pub fn initialize_storage(paths: &LedgerPaths, with_sample: bool) -> LedgerResult<InitReport> {
    paths.ensure_directories()?;

    let settings_created = !paths.is_initialized();
    if settings_created {
        Settings::default().save(paths)?;
    }

    let ledger_file = paths.ledger_file();
    let ledger_created = !ledger_file.exists();
    let mut sample_transactions = 0;
    if ledger_created {
        let store = if with_sample {
            LedgerStore::from_transactions(sample_transactions_list()?)?
        } else {
            LedgerStore::new()
        };
        sample_transactions = store.len();
        store.save(&ledger_file)?;
    }

    tracing::info!(
        base = %paths.base_dir().display(),
        settings_created,
        ledger_created,
        sample_transactions,
        "initialized storage"
    );

    Ok(InitReport {
        settings_created,
        ledger_created,
        sample_transactions,
    })
}

/// Example entries covering every income category and most expenses
pub fn sample_transactions_list() -> LedgerResult<Vec<Transaction>> {
    let entries: [(Flow, Category, i64, (u32, u32, u32), &str, Option<&str>); 7] = [
        (
            Flow::Income,
            Category::CompanyContribution,
            15_000_000,
            (1, 9, 0),
            "مشارکت ماه مهر شرکت",
            None,
        ),
        (
            Flow::Income,
            Category::ShopRental,
            2_000_000,
            (3, 11, 30),
            "اجاره مغازه شماره ۱",
            Some("آقای محمدی"),
        ),
        (
            Flow::Expense,
            Category::Groceries,
            3_500_000,
            (5, 15, 0),
            "خرید بسته‌های معیشتی برای ۵ خانوار",
            None,
        ),
        (
            Flow::Income,
            Category::DirectDonation,
            500_000,
            (10, 10, 15),
            "کمک نقدی",
            Some("یک همکار خیر"),
        ),
        (
            Flow::Expense,
            Category::AnimalSacrifice,
            5_000_000,
            (15, 8, 45),
            "قربانی اول ماه",
            None,
        ),
        (
            Flow::Expense,
            Category::Stationery,
            1_200_000,
            (18, 17, 20),
            "خرید لوازم‌التحریر برای دانش‌آموزان",
            None,
        ),
        (
            Flow::Expense,
            Category::Bread,
            750_000,
            (20, 13, 0),
            "تامین نان روزانه",
            None,
        ),
    ];

    entries
        .into_iter()
        .map(|(flow, category, amount, (day, hour, minute), description, source)| {
            let mut txn = Transaction::new(
                flow,
                category,
                Money::from_minor(amount),
                october_2025(day, hour, minute)?,
                description,
            );
            if let Some(source) = source {
                txn = txn.with_source(source);
            }
            Ok(txn)
        })
        .collect()
}

fn october_2025(day: u32, hour: u32, minute: u32) -> LedgerResult<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2025, 10, day, hour, minute, 0)
        .single()
        .ok_or_else(|| LedgerError::Validation(format!("invalid sample date 2025-10-{}", day)))
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.is_initialized() || !paths.ledger_file().exists()
}
