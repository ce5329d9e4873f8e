//! Calendar conversion commands

use chrono::NaiveDate;
use clap::Subcommand;

use super::CliContext;
use crate::calendar::{is_leap_year, CivilDate, JalaliDate};
use crate::error::{LedgerError, LedgerResult};

/// Date subcommands
#[derive(Subcommand, Debug)]
pub enum DateCommands {
    /// Convert a Jalali date (YYYY/MM/DD) to Gregorian
    ToGregorian {
        date: String,
    },
    /// Convert a Gregorian date (YYYY-MM-DD) to Jalali
    ToJalali {
        date: String,
    },
    /// Show today's date in both calendars
    Today,
}

/// Handle a date command
pub fn handle_date_command(ctx: &CliContext, cmd: DateCommands) -> LedgerResult<()> {
    match cmd {
        DateCommands::ToGregorian { date } => {
            let civil: CivilDate = date
                .parse()
                .map_err(|e| LedgerError::Validation(format!("Invalid date: {}", e)))?;
            let jalali = ctx
                .resolver
                .resolve_date(civil)
                .map_err(|e| LedgerError::Validation(format!("Invalid date: {}", e)))?;
            println!("{}", describe(jalali));
        }
        DateCommands::ToJalali { date } => {
            let gregorian = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
                LedgerError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", date))
            })?;
            let jalali = JalaliDate::from_gregorian(gregorian)
                .map_err(|e| LedgerError::Validation(format!("Invalid date: {}", e)))?;
            println!("{}", describe(jalali));
        }
        DateCommands::Today => {
            let today = ctx
                .resolver
                .today()
                .map_err(|e| LedgerError::Validation(e.to_string()))?;
            println!("{}", describe(today));
        }
    }

    Ok(())
}

/// "1404/07/09 (9 Mehr 1404) = 2025-10-01"
fn describe(date: JalaliDate) -> String {
    let leap = if is_leap_year(date.year()) {
        ", leap year"
    } else {
        ""
    };
    format!(
        "{} ({}{}) = {}",
        date,
        date.long_format(),
        leap,
        date.to_gregorian().format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let date = JalaliDate::new(1404, 7, 9).unwrap();
        assert_eq!(describe(date), "1404/07/09 (9 Mehr 1404) = 2025-10-01");

        let leap = JalaliDate::new(1403, 12, 30).unwrap();
        assert_eq!(
            describe(leap),
            "1403/12/30 (30 Esfand 1403, leap year) = 2025-03-20"
        );
    }
}
