//! Reports module for the charity ledger
//!
//! Everything here is derived from the ledger on demand and never stored:
//! the period aggregate with its monthly series, the category breakdown, the
//! balance statement, and the narrative prompt.

pub mod breakdown;
pub mod narrative;
pub mod period;
pub mod statement;

pub use breakdown::{CategoryBreakdown, CategoryShare, FlowBreakdown};
pub use narrative::{build_prompt, CommandGenerator, NarrativeGenerator, PromptLanguage};
pub use period::{MonthBucket, PeriodReport};
pub use statement::{BalanceStatement, StatementLine, TotalOverrides};
