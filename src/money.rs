//! Fixed-point monetary amounts.
//!
//! Totals are compared for equality and used as ledger keys, so amounts are
//! kept as whole minor units (hundredths) instead of floating point.
//! Arithmetic saturates at the `i64` bounds.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MINOR_PER_UNIT: i64 = 100;
const GROUPING_SEPARATOR: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("`{0}` is not a valid number")]
    NotANumber(String),
    #[error("amount `{0}` is out of range")]
    OutOfRange(String),
}

/// Amount of money in minor units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "f64", into = "f64")]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub const fn from_units(units: i64) -> Self {
        Self(units * MINOR_PER_UNIT)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// True when there are no minor units beyond whole units, so
    /// [`format_whole`](Self::format_whole) loses nothing.
    pub fn is_whole(self) -> bool {
        self.0 % MINOR_PER_UNIT == 0
    }

    /// Cost of `quantity` items at this unit price.
    pub fn times(self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Number of whole items of `price` this amount pays for. Zero when
    /// either side is not positive.
    pub fn affordable(self, price: Money) -> u32 {
        if self.0 <= 0 || price.0 <= 0 {
            return 0;
        }
        u32::try_from(self.0 / price.0).unwrap_or(u32::MAX)
    }

    /// Whole units, rounded half to even.
    pub fn round_units(self) -> i64 {
        let units = self.0.div_euclid(MINOR_PER_UNIT);
        let rest = self.0.rem_euclid(MINOR_PER_UNIT);
        let half = MINOR_PER_UNIT / 2;
        if rest > half || (rest == half && units % 2 != 0) {
            units + 1
        } else {
            units
        }
    }

    /// Renders the amount with no decimals and `,` thousands grouping.
    pub fn format_whole(self) -> String {
        group_signed(self.round_units())
    }

    /// Parses operator input such as `1200`, `1,200.50` or ` 7.5 `.
    pub fn parse(input: &str) -> Result<Money, MoneyParseError> {
        let cleaned: String = input
            .trim()
            .chars()
            .filter(|ch| *ch != GROUPING_SEPARATOR)
            .collect();
        let value: f64 = cleaned
            .parse()
            .map_err(|_| MoneyParseError::NotANumber(input.trim().to_string()))?;
        Money::try_from(value).map_err(|_| MoneyParseError::OutOfRange(input.trim().to_string()))
    }
}

/// Parses a grouped whole number as rendered by [`Money::format_whole`].
pub fn parse_whole(input: &str) -> Option<i64> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|ch| *ch != GROUPING_SEPARATOR)
        .collect();
    cleaned.parse().ok()
}

fn group_signed(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let grouped = group_digits(&digits, GROUPING_SEPARATOR);
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (idx + 3 - offset) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

impl TryFrom<f64> for Money {
    type Error = MoneyParseError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let minor = (value * MINOR_PER_UNIT as f64).round();
        if !minor.is_finite() || minor.abs() > i64::MAX as f64 / 4.0 {
            return Err(MoneyParseError::OutOfRange(value.to_string()));
        }
        Ok(Money(minor as i64))
    }
}

impl From<Money> for f64 {
    fn from(value: Money) -> Self {
        value.0 as f64 / MINOR_PER_UNIT as f64
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / MINOR_PER_UNIT as u64;
        let cents = abs % MINOR_PER_UNIT as u64;
        write!(
            f,
            "{}{}.{:02}",
            sign,
            group_digits(&units.to_string(), GROUPING_SEPARATOR),
            cents
        )
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(Money::from_units(0).format_whole(), "0");
        assert_eq!(Money::from_units(999).format_whole(), "999");
        assert_eq!(Money::from_units(1_000).format_whole(), "1,000");
        assert_eq!(Money::from_units(1_234_567).format_whole(), "1,234,567");
        assert_eq!(Money::from_units(-12_345).format_whole(), "-12,345");
    }

    #[test]
    fn rounds_half_to_even() {
        assert_eq!(Money::from_minor(1_250).round_units(), 12);
        assert_eq!(Money::from_minor(3_750).round_units(), 38);
        assert_eq!(Money::from_minor(250).round_units(), 2);
        assert_eq!(Money::from_minor(251).round_units(), 3);
        assert_eq!(Money::from_minor(1_049).round_units(), 10);
        assert_eq!(Money::from_minor(-1_050).round_units(), -10);
        assert_eq!(Money::from_minor(-1_150).round_units(), -12);
        assert_eq!(Money::from_minor(1_250).format_whole(), "12");
        assert_eq!(Money::from_minor(250_050).format_whole(), "2,500");
    }

    #[test]
    fn whole_amounts() {
        assert!(Money::from_units(12).is_whole());
        assert!(!Money::from_minor(1_250).is_whole());
        assert!(Money::from_minor(-300).is_whole());
    }

    #[test]
    fn arithmetic_saturates() {
        let huge = Money::from_minor(i64::MAX / 4);
        assert_eq!(huge.times(48), Money::from_minor(i64::MAX));
        assert_eq!(huge.times(48) + huge, Money::from_minor(i64::MAX));
        assert_eq!(Money::from_minor(i64::MIN) - huge, Money::from_minor(i64::MIN));
        let total: Money = vec![huge; 10].into_iter().sum();
        assert_eq!(total, Money::from_minor(i64::MAX));
    }

    #[test]
    fn parses_operator_input() {
        assert_eq!(Money::parse("1,200.50").unwrap(), Money::from_minor(120_050));
        assert_eq!(Money::parse(" 7 ").unwrap(), Money::from_units(7));
        assert!(matches!(
            Money::parse("abc"),
            Err(MoneyParseError::NotANumber(_))
        ));
        assert!(Money::parse("inf").is_err());
    }

    #[test]
    fn affordable_uses_integer_division() {
        let budget = Money::from_units(100);
        assert_eq!(budget.affordable(Money::from_units(7)), 14);
        assert_eq!(Money::from_units(-5).affordable(Money::from_units(7)), 0);
        assert_eq!(budget.affordable(Money::ZERO), 0);
    }

    #[test]
    fn display_keeps_minor_units() {
        assert_eq!(Money::from_minor(1_234_567).to_string(), "12,345.67");
        assert_eq!(parse_whole("12,345"), Some(12_345));
    }
}
