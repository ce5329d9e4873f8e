//! Date range resolver
//!
//! Turns user-entered solar Hijri dates into a validated [`DateRange`] of UTC
//! instants. A range is either fully valid or rejected; there is no fallback
//! to a partial range.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Offset, Utc};

use super::{CivilDate, DateInputError, DateRange, JalaliDate, RangeBound, RangeError};
use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};

/// Lowest Jalali year accepted from user input unless configured otherwise
pub const DEFAULT_YEAR_FLOOR: i32 = 1300;

/// Iran Standard Time, +03:30, in minutes east of UTC
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 3 * 60 + 30;

/// Resolves civil dates against a fixed local UTC offset
#[derive(Debug, Clone, Copy)]
pub struct DateRangeResolver {
    offset: FixedOffset,
    year_floor: i32,
}

impl DateRangeResolver {
    /// Create a resolver for the given local offset and year floor
    pub fn new(offset: FixedOffset, year_floor: i32) -> Self {
        Self { offset, year_floor }
    }

    /// Create a resolver from user settings
    pub fn from_settings(settings: &Settings) -> LedgerResult<Self> {
        let offset = FixedOffset::east_opt(settings.utc_offset_minutes * 60).ok_or_else(|| {
            LedgerError::Config(format!(
                "UTC offset of {} minutes is out of range",
                settings.utc_offset_minutes
            ))
        })?;
        Ok(Self::new(offset, settings.year_floor))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn year_floor(&self) -> i32 {
        self.year_floor
    }

    /// Validate a single civil date
    pub fn resolve_date(&self, civil: CivilDate) -> Result<JalaliDate, DateInputError> {
        if civil.year < self.year_floor {
            return Err(DateInputError::YearBelowFloor {
                year: civil.year,
                floor: self.year_floor,
            });
        }
        JalaliDate::new(civil.year, civil.month, civil.day)
    }

    /// Resolve a start and end date into an inclusive range of whole days
    pub fn resolve(&self, start: CivilDate, end: CivilDate) -> Result<DateRange, RangeError> {
        let (first_day, last_day) = match (self.resolve_date(start), self.resolve_date(end)) {
            (Ok(first), Ok(last)) => (first, last),
            (Err(source), Ok(_)) => {
                return Err(RangeError::Invalid {
                    bound: RangeBound::Start,
                    source,
                })
            }
            (Ok(_), Err(source)) => {
                return Err(RangeError::Invalid {
                    bound: RangeBound::End,
                    source,
                })
            }
            (Err(start), Err(end)) => return Err(RangeError::BothInvalid { start, end }),
        };

        if first_day > last_day {
            tracing::warn!(%first_day, %last_day, "rejected range with start after end");
            return Err(RangeError::StartAfterEnd {
                start: first_day,
                end: last_day,
            });
        }

        let range = DateRange::new(
            self.start_of_day(first_day),
            self.end_of_day(last_day),
            self.offset,
            first_day,
            last_day,
        );
        tracing::debug!(
            range = %range,
            start = %range.start(),
            end = %range.end(),
            "resolved date range"
        );
        Ok(range)
    }

    /// 00:00:00.000 local time on `date`, as a UTC instant
    pub fn start_of_day(&self, date: JalaliDate) -> DateTime<Utc> {
        self.at_local_time(date, NaiveTime::MIN)
    }

    /// 23:59:59.999 local time on `date`, as a UTC instant
    pub fn end_of_day(&self, date: JalaliDate) -> DateTime<Utc> {
        self.start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
    }

    /// A local wall-clock time on `date`, as a UTC instant
    pub fn at_local_time(&self, date: JalaliDate, time: NaiveTime) -> DateTime<Utc> {
        let local = date.to_gregorian().and_time(time);
        let utc = local - Duration::seconds(self.offset.local_minus_utc() as i64);
        utc.and_utc()
    }

    /// The Jalali date of an instant in local time
    pub fn local_date(&self, timestamp: DateTime<Utc>) -> Result<JalaliDate, DateInputError> {
        JalaliDate::from_gregorian(timestamp.with_timezone(&self.offset).date_naive())
    }

    /// Today's Jalali date in local time
    pub fn today(&self) -> Result<JalaliDate, DateInputError> {
        self.local_date(Utc::now())
    }

    /// From Farvardin 1 of the current Jalali year through today
    pub fn year_to_date(&self) -> Result<DateRange, RangeError> {
        let today = self.today().map_err(|source| RangeError::Invalid {
            bound: RangeBound::End,
            source,
        })?;
        self.resolve(today.start_of_year().into(), today.into())
    }
}

impl Default for DateRangeResolver {
    /// Iran Standard Time (+03:30) with the default year floor
    fn default() -> Self {
        let offset = FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60).unwrap_or_else(|| Utc.fix());
        Self::new(offset, DEFAULT_YEAR_FLOOR)
    }
}
