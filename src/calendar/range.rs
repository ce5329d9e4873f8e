//! Resolved reporting range

use chrono::{DateTime, FixedOffset, Utc};

use super::{JalaliDate, JalaliMonth};

/// An inclusive span of instants covering whole local days
///
/// Only [`DateRangeResolver`](super::DateRangeResolver) builds ranges, so
/// `start <= end` always holds and both bounds fall in supported calendar
/// years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    offset: FixedOffset,
    first_day: JalaliDate,
    last_day: JalaliDate,
}

impl DateRange {
    pub(crate) fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        offset: FixedOffset,
        first_day: JalaliDate,
        last_day: JalaliDate,
    ) -> Self {
        Self {
            start,
            end,
            offset,
            first_day,
            last_day,
        }
    }

    /// 00:00:00.000 local time on the first day, as UTC
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// 23:59:59.999 local time on the last day, as UTC
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn first_day(&self) -> JalaliDate {
        self.first_day
    }

    pub fn last_day(&self) -> JalaliDate {
        self.last_day
    }

    /// Check if an instant falls within the range (both ends inclusive)
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    /// The Jalali date of an instant in the range's local offset
    pub fn local_date(&self, timestamp: DateTime<Utc>) -> Option<JalaliDate> {
        let local = timestamp.with_timezone(&self.offset).date_naive();
        JalaliDate::from_gregorian(local).ok()
    }

    /// The Jalali month of an instant in the range's local offset
    pub fn month_of(&self, timestamp: DateTime<Utc>) -> Option<JalaliMonth> {
        self.local_date(timestamp).map(|date| date.month_key())
    }

    /// Every calendar month touched by the range, oldest first
    pub fn months(&self) -> Vec<JalaliMonth> {
        let last = self.last_day.month_key();
        let mut month = self.first_day.month_key();
        let mut months = vec![month];
        while month < last {
            month = month.next();
            months.push(month);
        }
        months
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.first_day, self.last_day)
    }
}
