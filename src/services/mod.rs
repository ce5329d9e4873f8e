//! Service layer for the charity ledger
//!
//! The service layer turns user input into validated ledger mutations on top
//! of the storage layer.

pub mod transaction;

pub use transaction::{CreateTransactionInput, TransactionFilter, TransactionService};
