//! Solar Hijri (Jalali) calendar arithmetic
//!
//! Conversion uses the 33-year break table for the astronomical solar Hijri
//! calendar, which covers Jalali years -61 through 3177. Every conversion in
//! the crate goes through this module.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DateInputError;

/// First Jalali year covered by the break table
pub const MIN_SUPPORTED_YEAR: i32 = -61;

/// Last Jalali year covered by the break table
pub const MAX_SUPPORTED_YEAR: i32 = 3177;

/// Years in which the 33-year leap cycle is re-anchored
const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

const MONTH_NAMES: [&str; 12] = [
    "Farvardin",
    "Ordibehesht",
    "Khordad",
    "Tir",
    "Mordad",
    "Shahrivar",
    "Mehr",
    "Aban",
    "Azar",
    "Dey",
    "Bahman",
    "Esfand",
];

const PERSIAN_MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Placement of a Jalali year against the Gregorian calendar
#[derive(Debug, Clone, Copy)]
struct YearInfo {
    /// Years since the last leap year (0 means this year is leap)
    leap: i32,
    /// Gregorian year in which this Jalali year begins
    gregorian_year: i32,
    /// Day of March on which Farvardin 1 falls
    march_day: u32,
}

fn year_info(year: i32) -> Option<YearInfo> {
    if !(MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&year) {
        return None;
    }

    let gregorian_year = year + 621;
    let mut leap_j = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;

    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if year < jm {
            break;
        }
        leap_j += jump / 33 * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = year - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gregorian_year / 4 - (gregorian_year / 100 + 1) * 3 / 4 - 150;
    let march_day = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    Some(YearInfo {
        leap,
        gregorian_year,
        march_day: march_day as u32,
    })
}

fn nowruz(info: YearInfo) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(info.gregorian_year, 3, info.march_day)
}

/// Check whether a Jalali year is covered by the conversion table
pub fn is_supported_year(year: i32) -> bool {
    (MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&year)
}

/// Check whether a Jalali year has 366 days
///
/// Years outside the supported table are reported as common years.
pub fn is_leap_year(year: i32) -> bool {
    year_info(year).map(|info| info.leap == 0).unwrap_or(false)
}

/// Number of days in a Jalali month (0 for a month outside 1..=12)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1..=6 => 31,
        7..=11 => 30,
        12 if is_leap_year(year) => 30,
        12 => 29,
        _ => 0,
    }
}

/// A valid date in the solar Hijri calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JalaliDate {
    year: i32,
    month: u32,
    day: u32,
    /// Same day in the Gregorian calendar, fixed by the fields above
    gregorian: NaiveDate,
}

/// Days since Farvardin 1
fn day_of_year(month: u32, day: u32) -> i64 {
    let month = month as i64;
    (month - 1) * 31 - (month / 7) * (month - 7) + day as i64 - 1
}

impl JalaliDate {
    /// Build a date, checking that it exists in the calendar
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DateInputError> {
        if !is_supported_year(year) {
            return Err(DateInputError::UnsupportedYear(year));
        }
        if !(1..=12).contains(&month) {
            return Err(DateInputError::MonthOutOfRange(month));
        }
        let days_in_month = days_in_month(year, month);
        if day == 0 || day > days_in_month {
            return Err(DateInputError::DayOutOfRange {
                year,
                month,
                day,
                days_in_month,
            });
        }
        let first = year_info(year)
            .and_then(nowruz)
            .ok_or(DateInputError::UnsupportedYear(year))?;
        Ok(Self {
            year,
            month,
            day,
            gregorian: first + Duration::days(day_of_year(month, day)),
        })
    }

    /// Convert a Gregorian date into the Jalali calendar
    pub fn from_gregorian(date: NaiveDate) -> Result<Self, DateInputError> {
        let gregorian_year = date.year();
        let mut year = gregorian_year - 621;
        let info = year_info(year).ok_or(DateInputError::UnsupportedYear(year))?;
        let first = nowruz(info).ok_or(DateInputError::UnsupportedYear(year))?;

        let mut k = (date - first).num_days();
        if k >= 0 {
            if k <= 185 {
                return Self::new(year, 1 + (k / 31) as u32, (k % 31) as u32 + 1);
            }
            k -= 186;
        } else {
            // Dey through Esfand of the previous Jalali year
            year -= 1;
            k += 179;
            if info.leap == 1 {
                k += 1;
            }
        }

        Self::new(year, 7 + (k / 30) as u32, (k % 30) as u32 + 1)
    }

    /// Convert to the Gregorian calendar
    pub fn to_gregorian(&self) -> NaiveDate {
        self.gregorian
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// The calendar month containing this date
    pub fn month_key(&self) -> JalaliMonth {
        JalaliMonth {
            year: self.year,
            month: self.month,
        }
    }

    /// First day of the Jalali year containing this date
    pub fn start_of_year(&self) -> Self {
        Self {
            year: self.year,
            month: 1,
            day: 1,
            gregorian: self.gregorian - Duration::days(day_of_year(self.month, self.day)),
        }
    }

    /// Long form used in reports, e.g. "9 Mehr 1404"
    pub fn long_format(&self) -> String {
        format!("{} {} {}", self.day, self.month_key().name(), self.year)
    }
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

impl From<JalaliDate> for String {
    fn from(date: JalaliDate) -> Self {
        date.to_string()
    }
}

impl TryFrom<String> for JalaliDate {
    type Error = DateInputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for JalaliDate {
    type Err = DateInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let civil: CivilDate = s.parse()?;
        Self::new(civil.year, civil.month, civil.day)
    }
}

/// Unvalidated year/month/day as entered by a user
///
/// Parsing only checks the shape; whether the date exists in the calendar is
/// decided by [`JalaliDate::new`] or the range resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CivilDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

impl From<JalaliDate> for CivilDate {
    fn from(date: JalaliDate) -> Self {
        Self::new(date.year, date.month, date.day)
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.year, self.month, self.day)
    }
}

impl FromStr for CivilDate {
    type Err = DateInputError;

    /// Accepts "1404/07/09" or "1404-7-9"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parts: Vec<&str> = s.split(|c: char| c == '/' || c == '-').collect();
        if parts.len() != 3 {
            return Err(DateInputError::Malformed(s.to_string()));
        }

        let malformed = |_| DateInputError::Malformed(s.to_string());
        Ok(Self {
            year: parts[0].trim().parse().map_err(malformed)?,
            month: parts[1].trim().parse().map_err(malformed)?,
            day: parts[2].trim().parse().map_err(malformed)?,
        })
    }
}

/// A Jalali calendar month, used as the structural key for monthly buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JalaliMonth {
    pub year: i32,
    pub month: u32,
}

impl JalaliMonth {
    /// The following month, rolling Esfand over into Farvardin
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Transliterated month name, e.g. "Mehr"
    pub fn name(&self) -> &'static str {
        MONTH_NAMES[(self.month.clamp(1, 12) - 1) as usize]
    }

    /// Month name in Persian script, e.g. "مهر"
    pub fn persian_name(&self) -> &'static str {
        PERSIAN_MONTH_NAMES[(self.month.clamp(1, 12) - 1) as usize]
    }

    /// Chart label, e.g. "Mehr 1404"
    pub fn label(&self) -> String {
        format!("{} {}", self.name(), self.year)
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }
}

impl fmt::Display for JalaliMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greg(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nowruz_1404() {
        let date = JalaliDate::new(1404, 1, 1).unwrap();
        assert_eq!(date.to_gregorian(), greg(2025, 3, 21));
    }

    #[test]
    fn test_nowruz_1403() {
        let date = JalaliDate::new(1403, 1, 1).unwrap();
        assert_eq!(date.to_gregorian(), greg(2024, 3, 20));
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(1399));
        assert!(is_leap_year(1403));
        assert!(!is_leap_year(1402));
        assert!(!is_leap_year(1404));
        assert_eq!(days_in_month(1403, 12), 30);
        assert_eq!(days_in_month(1404, 12), 29);
    }

    #[test]
    fn test_last_day_of_leap_year() {
        let date = JalaliDate::new(1403, 12, 30).unwrap();
        assert_eq!(date.to_gregorian(), greg(2025, 3, 20));
    }

    #[test]
    fn test_esfand_30_rejected_in_common_year() {
        let err = JalaliDate::new(1404, 12, 30).unwrap_err();
        assert_eq!(
            err,
            DateInputError::DayOutOfRange {
                year: 1404,
                month: 12,
                day: 30,
                days_in_month: 29,
            }
        );
    }

    #[test]
    fn test_month_lengths() {
        assert_eq!(days_in_month(1404, 1), 31);
        assert_eq!(days_in_month(1404, 6), 31);
        assert_eq!(days_in_month(1404, 7), 30);
        assert_eq!(days_in_month(1404, 11), 30);
        assert_eq!(days_in_month(1404, 13), 0);
        assert!(JalaliDate::new(1404, 6, 31).is_ok());
        assert!(JalaliDate::new(1404, 7, 31).is_err());
        assert!(JalaliDate::new(1404, 13, 1).is_err());
        assert!(JalaliDate::new(1404, 1, 0).is_err());
    }

    #[test]
    fn test_from_gregorian_known_dates() {
        assert_eq!(
            JalaliDate::from_gregorian(greg(2025, 10, 1)).unwrap(),
            JalaliDate::new(1404, 7, 9).unwrap()
        );
        assert_eq!(
            JalaliDate::from_gregorian(greg(2025, 9, 23)).unwrap(),
            JalaliDate::new(1404, 7, 1).unwrap()
        );
        assert_eq!(
            JalaliDate::from_gregorian(greg(2025, 3, 20)).unwrap(),
            JalaliDate::new(1403, 12, 30).unwrap()
        );
        assert_eq!(
            JalaliDate::from_gregorian(greg(2025, 1, 1)).unwrap(),
            JalaliDate::new(1403, 10, 12).unwrap()
        );
    }

    #[test]
    fn test_conversion_is_reversible_across_years() {
        let mut date = greg(2019, 1, 1);
        let end = greg(2027, 12, 31);
        while date <= end {
            let jalali = JalaliDate::from_gregorian(date).unwrap();
            assert_eq!(jalali.to_gregorian(), date, "round trip failed for {}", date);
            date += Duration::days(1);
        }
    }

    #[test]
    fn test_consecutive_days_are_consecutive() {
        let mut previous = JalaliDate::from_gregorian(greg(2024, 3, 1)).unwrap();
        let mut date = greg(2024, 3, 2);
        for _ in 0..800 {
            let current = JalaliDate::from_gregorian(date).unwrap();
            assert!(current > previous);
            if current.month() == previous.month() {
                assert_eq!(current.day(), previous.day() + 1);
            } else {
                assert_eq!(current.day(), 1);
                assert_eq!(previous.day(), days_in_month(previous.year(), previous.month()));
            }
            previous = current;
            date += Duration::days(1);
        }
    }

    #[test]
    fn test_unsupported_year() {
        assert_eq!(
            JalaliDate::new(3178, 1, 1),
            Err(DateInputError::UnsupportedYear(3178))
        );
    }

    #[test]
    fn test_parse_and_display() {
        let date: JalaliDate = "1404/7/9".parse().unwrap();
        assert_eq!(date.to_string(), "1404/07/09");
        let date: JalaliDate = "1404-07-09".parse().unwrap();
        assert_eq!(date.long_format(), "9 Mehr 1404");
        assert!(matches!(
            "1404/07".parse::<JalaliDate>(),
            Err(DateInputError::Malformed(_))
        ));
    }

    #[test]
    fn test_civil_date_parse_keeps_illegal_values() {
        let civil: CivilDate = "1300/13/1".parse().unwrap();
        assert_eq!(civil, CivilDate::new(1300, 13, 1));
    }

    #[test]
    fn test_month_navigation_and_labels() {
        let esfand = JalaliMonth {
            year: 1403,
            month: 12,
        };
        assert_eq!(
            esfand.next(),
            JalaliMonth {
                year: 1404,
                month: 1
            }
        );
        assert_eq!(esfand.label(), "Esfand 1403");
        assert_eq!(esfand.persian_name(), "اسفند");
        assert_eq!(esfand.to_string(), "1403/12");
        assert_eq!(esfand.days(), 30);
    }

    #[test]
    fn test_serialization() {
        let date = JalaliDate::new(1404, 7, 9).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"1404/07/09\"");
        let back: JalaliDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
        assert!(serde_json::from_str::<JalaliDate>("\"1404/12/30\"").is_err());
    }
}
