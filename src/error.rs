//! Error types for the charity ledger
//!
//! Rejected dates carry the structured [`RangeError`] so callers can tell
//! which bound was wrong; everything else is a message with a category.

use thiserror::Error;

use crate::calendar::RangeError;

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A civil date or date range could not be resolved
    #[error("Invalid date input: {0}")]
    InvalidDateInput(#[from] RangeError),

    /// A transaction or other input broke a ledger rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// No transaction has this ID or ID prefix
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// A transaction with this ID is already in the ledger
    #[error("Transaction already exists: {0}")]
    DuplicateTransaction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// The ledger snapshot could not be read or written
    #[error("JSON error: {0}")]
    Json(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    /// The external narrative generator failed
    #[error("Narrative generation failed: {0}")]
    Narrative(String),
}

impl LedgerError {
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::TransactionNotFound(identifier.into())
    }

    pub fn duplicate_transaction(identifier: impl Into<String>) -> Self {
        Self::DuplicateTransaction(identifier.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TransactionNotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Rejected civil date or date range
    pub fn is_invalid_date_input(&self) -> bool {
        matches!(self, Self::InvalidDateInput(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
