//! Whole-rial amounts
//!
//! There is no fractional unit, so a [`Money`] is an i64 count of rials and
//! all arithmetic on it is exact.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters dropped before parsing: ASCII and Arabic thousands separators
const GROUP_SEPARATORS: [char; 4] = [',', '_', ' ', '\u{066C}'];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

/// Why a string is not an amount
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("Invalid money format: {0}")]
    InvalidFormat(String),
    #[error("Amount out of range: {0} (limit is 1,000,000,000,000,000)")]
    OutOfRange(String),
}

impl Money {
    /// Largest magnitude accepted for a single amount: 10^15 rials
    ///
    /// Per-amount and whole-ledger limits keep every total, balance and
    /// override well inside `i64`.
    pub const MAX_AMOUNT: Money = Money(1_000_000_000_000_000);

    /// ```
    /// use charity_ledger::models::Money;
    /// assert_eq!(Money::from_minor(15_000_000).to_string(), "15,000,000");
    /// ```
    pub const fn from_minor(units: i64) -> Self {
        Self(units)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn minor(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Magnitude is at most [`Money::MAX_AMOUNT`]
    pub fn is_within_limit(&self) -> bool {
        self.0.unsigned_abs() <= Self::MAX_AMOUNT.0.unsigned_abs()
    }

    /// Parse user input such as "15,000,000", "-400" or "+400"
    ///
    /// Persian and Arabic-Indic digits are read as their ASCII values.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let input = s.trim();
        let cleaned: String = input
            .chars()
            .filter(|c| !GROUP_SEPARATORS.contains(c))
            .map(ascii_digit)
            .collect();

        let (sign, digits) = match cleaned.as_bytes().first() {
            Some(b'-') => (-1, &cleaned[1..]),
            Some(b'+') => (1, &cleaned[1..]),
            _ => (1, cleaned.as_str()),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MoneyParseError::InvalidFormat(input.to_string()));
        }

        digits
            .parse::<i64>()
            .ok()
            .map(|units| Self(sign * units))
            .filter(Money::is_within_limit)
            .ok_or_else(|| MoneyParseError::OutOfRange(input.to_string()))
    }

    /// "15,000,000 IRR", or just the number when the label is empty
    pub fn format_with_label(&self, label: &str) -> String {
        match label {
            "" => self.to_string(),
            label => format!("{} {}", self, label),
        }
    }
}

/// Map Extended Arabic-Indic (Persian) and Arabic-Indic digits to ASCII
fn ascii_digit(c: char) -> char {
    let zero = match c {
        '\u{06F0}'..='\u{06F9}' => 0x06F0,
        '\u{0660}'..='\u{0669}' => 0x0660,
        _ => return c,
    };
    char::from_digit(c as u32 - zero, 10).unwrap_or(c)
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Thousands are grouped with commas; width and alignment flags apply to
/// the grouped text.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let lead = match digits.len() % 3 {
            0 => 3,
            n => n,
        };

        let mut out = String::with_capacity(digits.len() * 4 / 3 + 1);
        if self.is_negative() {
            out.push('-');
        }
        out.push_str(&digits[..lead]);
        for group in digits.as_bytes()[lead..].chunks(3) {
            out.push(',');
            out.extend(group.iter().map(|&b| b as char));
        }
        f.pad(&out)
    }
}

macro_rules! money_ops {
    ($($op:ident::$method:ident, $assign:ident::$assign_method:ident, $sym:tt;)*) => {$(
        impl $op for Money {
            type Output = Self;

            fn $method(self, other: Self) -> Self {
                Self(self.0 $sym other.0)
            }
        }

        impl $assign for Money {
            fn $assign_method(&mut self, other: Self) {
                *self = *self $sym other;
            }
        }
    )*};
}

money_ops! {
    Add::add, AddAssign::add_assign, +;
    Sub::sub, SubAssign::sub_assign, -;
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|m| m.0).sum())
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
