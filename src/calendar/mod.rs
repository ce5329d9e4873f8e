//! Calendar boundary for the ledger
//!
//! Transactions are stored as UTC instants on the Gregorian timeline while
//! every user-facing date is entered in the solar Hijri calendar. All
//! conversion between the two happens in this module:
//!
//! - `jalali`: calendar arithmetic (conversion, leap years, month lengths)
//! - `range`: the resolved [`DateRange`] and its local-month lookups
//! - `resolver`: [`DateRangeResolver`], which validates civil dates and
//!   normalizes them to day boundaries in the configured UTC offset

pub mod jalali;
pub mod range;
pub mod resolver;

pub use jalali::{days_in_month, is_leap_year, CivilDate, JalaliDate, JalaliMonth};
pub use range::DateRange;
pub use resolver::DateRangeResolver;

use std::fmt;
use thiserror::Error;

/// Why a single civil date was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateInputError {
    #[error("'{0}' is not a year/month/day date")]
    Malformed(String),

    #[error("year {year} is before {floor}")]
    YearBelowFloor { year: i32, floor: i32 },

    #[error("year {0} is outside the supported calendar range")]
    UnsupportedYear(i32),

    #[error("month {0} is not between 1 and 12")]
    MonthOutOfRange(u32),

    #[error("day {day} does not exist in {year}/{month:02} ({days_in_month} days)")]
    DayOutOfRange {
        year: i32,
        month: u32,
        day: u32,
        days_in_month: u32,
    },
}

/// Which end of a range a date was entered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Start,
    End,
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::End => write!(f, "end"),
        }
    }
}

/// Why a date range was rejected; no partial range is ever produced
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("{bound} date is invalid: {source}")]
    Invalid {
        bound: RangeBound,
        source: DateInputError,
    },

    #[error("both dates are invalid (start: {start}; end: {end})")]
    BothInvalid {
        start: DateInputError,
        end: DateInputError,
    },

    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: JalaliDate, end: JalaliDate },
}
