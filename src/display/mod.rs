//! Display formatting for terminal output
//!
//! Helpers shared by the report renderers and the transaction register.

pub mod report;
pub mod transaction;

pub use report::{format_bar, format_net_bar, format_percentage, separator};
pub use transaction::{format_transaction_details, format_transaction_register};
