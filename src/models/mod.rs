//! Core data models for the charity ledger
//!
//! This module contains the value types of the bookkeeping domain:
//! transactions, their flows and categories, and money amounts.

pub mod ids;
pub mod money;
pub mod transaction;

pub use ids::TransactionId;
pub use money::{Money, MoneyParseError};
pub use transaction::{Category, Flow, Transaction, TransactionValidationError};
