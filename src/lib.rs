//! Charity Ledger - bookkeeping and period reports for a small charity
//!
//! Transactions are stored as UTC instants and reported over date ranges
//! entered in the solar Hijri (Jalali) calendar. A period report filters the
//! ledger to a range, buckets it into local Jalali months with a running
//! balance, and feeds a balance statement and a narrative analysis prompt.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `calendar`: Jalali conversion and date range resolution
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, money, IDs)
//! - `storage`: JSON snapshot storage and the in-memory ledger
//! - `services`: Transaction creation and listing
//! - `reports`: Period aggregate, category breakdown, statement, narrative
//! - `display`: Terminal formatting
//! - `export`: CSV, JSON and YAML import/export
//! - `cli`: Command handlers for the `charity` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use charity_ledger::calendar::{CivilDate, DateRangeResolver};
//! use charity_ledger::models::Money;
//! use charity_ledger::reports::PeriodReport;
//!
//! let resolver = DateRangeResolver::default();
//! let range = resolver.resolve(CivilDate::new(1404, 7, 1), CivilDate::new(1404, 7, 30))?;
//! let report = PeriodReport::generate(store.all(), &range, Money::zero());
//! ```

pub mod calendar;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
