//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the ledger and report layers.

pub mod date;
pub mod export;
pub mod import;
pub mod report;
pub mod setup;
pub mod transaction;

pub use date::{handle_date_command, DateCommands};
pub use export::{handle_export_command, ExportArgs, ExportFormat};
pub use import::{handle_import_command, ImportArgs};
pub use report::{handle_report_command, ReportArgs};
pub use setup::{handle_config_command, handle_init_command, handle_summary_command};
pub use transaction::{handle_transaction_command, TransactionCommands};

use crate::calendar::{CivilDate, DateInputError, DateRange, DateRangeResolver, RangeBound, RangeError};
use crate::config::{LedgerPaths, Settings};
use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;
use crate::storage::LedgerStore;

/// Everything a command needs once paths and settings are resolved
#[derive(Debug, Clone)]
pub struct CliContext {
    pub paths: LedgerPaths,
    pub settings: Settings,
    pub resolver: DateRangeResolver,
}

impl CliContext {
    /// Load settings for `paths` and build the date resolver from them
    pub fn load(paths: LedgerPaths) -> LedgerResult<Self> {
        let settings = Settings::load_or_create(&paths)?;
        let resolver = DateRangeResolver::from_settings(&settings)?;
        Ok(Self {
            paths,
            settings,
            resolver,
        })
    }

    pub fn load_ledger(&self) -> LedgerResult<LedgerStore> {
        LedgerStore::load(self.paths.ledger_file())
    }

    pub fn save_ledger(&self, store: &LedgerStore) -> LedgerResult<()> {
        store.save(self.paths.ledger_file())
    }
}

/// Resolve optional `--from`/`--to` arguments
///
/// A missing start is Farvardin 1 of the current Jalali year and a missing
/// end is today, both in local time.
pub fn resolve_period(
    resolver: &DateRangeResolver,
    from: Option<&str>,
    to: Option<&str>,
) -> LedgerResult<DateRange> {
    let today = || {
        resolver.today().map_err(|source| RangeError::Invalid {
            bound: RangeBound::End,
            source,
        })
    };

    let start: Result<CivilDate, DateInputError> = match from {
        Some(s) => s.parse(),
        None => Ok(today()?.start_of_year().into()),
    };
    let end: Result<CivilDate, DateInputError> = match to {
        Some(s) => s.parse(),
        None => Ok(today()?.into()),
    };

    let resolved = match (start, end) {
        (Ok(start), Ok(end)) => resolver.resolve(start, end),
        (Err(source), Ok(_)) => Err(RangeError::Invalid {
            bound: RangeBound::Start,
            source,
        }),
        (Ok(_), Err(source)) => Err(RangeError::Invalid {
            bound: RangeBound::End,
            source,
        }),
        (Err(start), Err(end)) => Err(RangeError::BothInvalid { start, end }),
    };

    resolved.map_err(|e| {
        tracing::warn!(error = %e, "rejected date range");
        LedgerError::from(e)
    })
}

/// Parse a money argument, naming the flag in the error
pub(crate) fn parse_money_arg(flag: &str, value: &str) -> LedgerResult<Money> {
    Money::parse(value).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid {} '{}': {}. Use whole rials, e.g. 1500000 or 1,500,000",
            flag, value, e
        ))
    })
}
