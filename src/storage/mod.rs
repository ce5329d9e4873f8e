//! Storage layer for the charity ledger
//!
//! The [`LedgerStore`] owns the transactions in memory. Between CLI
//! invocations it is kept in a JSON snapshot written with atomic renames.

pub mod file_io;
pub mod init;
pub mod ledger;

pub use file_io::{read_json, read_json_if_exists, write_json_atomic};
pub use init::{initialize_storage, needs_initialization, sample_transactions_list, InitReport};
pub use ledger::{LedgerStore, LedgerTotals, MAX_LEDGER_TURNOVER};
