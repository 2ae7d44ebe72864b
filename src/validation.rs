//! Validators for operator input.
//!
//! Each returns the parsed value or a [`ValidationError`] whose message is
//! shown before the prompt repeats.

use std::fmt;

use crate::config::GeneratorConfig;
use crate::domain::{MonthRange, Product, TotalRange, YearMonth};
use crate::money::Money;

/// Lowest unit price accepted regardless of the total range.
pub const MIN_PRICE_UNITS: i64 = 10;
/// A price must let `max_bags * orders_per_month * PRICE_FLOOR_FACTOR` bags
/// reach the minimum total.
pub const PRICE_FLOOR_FACTOR: i64 = 3;
/// Largest price or total accepted, in whole units.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub fn parse_month(input: &str) -> ValidationResult<u32> {
    let month: u32 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::new("Enter a whole number (e.g., 3)"))?;
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(ValidationError::new("Month must be between 1 and 12"))
    }
}

pub fn parse_year(input: &str) -> ValidationResult<i32> {
    let year: i32 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::new("Enter a year such as 2024"))?;
    if (1..=9999).contains(&year) {
        Ok(year)
    } else {
        Err(ValidationError::new("Year must be between 1 and 9999"))
    }
}

pub fn validate_month_range(
    start_month: u32,
    start_year: i32,
    end_month: u32,
    end_year: i32,
) -> ValidationResult<MonthRange> {
    let start = YearMonth::new(start_year, start_month)
        .ok_or_else(|| ValidationError::new("Start month is not a calendar month"))?;
    let end = YearMonth::new(end_year, end_month)
        .ok_or_else(|| ValidationError::new("End month is not a calendar month"))?;
    MonthRange::new(start, end)
        .ok_or_else(|| ValidationError::new("Start date must be before end date"))
}

/// Parses a strictly positive amount.
pub fn parse_amount(input: &str) -> ValidationResult<Money> {
    let amount = Money::parse(input).map_err(|_| ValidationError::new("Enter a valid number"))?;
    if !amount.is_positive() {
        return Err(ValidationError::new("Amounts must be positive"));
    }
    check_ceiling(amount)
}

fn check_ceiling(amount: Money) -> ValidationResult<Money> {
    if amount > Money::from_units(MAX_AMOUNT_UNITS) {
        return Err(ValidationError::new(format!(
            "Amounts must not exceed {}",
            Money::from_units(MAX_AMOUNT_UNITS).format_whole()
        )));
    }
    Ok(amount)
}

pub fn validate_total_range(min: Money, max: Money) -> ValidationResult<TotalRange> {
    if !min.is_positive() || !max.is_positive() {
        return Err(ValidationError::new("Amounts must be positive"));
    }
    if min > max {
        return Err(ValidationError::new("Minimum must be less than maximum"));
    }
    check_ceiling(max)?;
    Ok(TotalRange::new(min, max))
}

pub fn parse_product_count(input: &str) -> ValidationResult<usize> {
    let count: usize = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::new("Enter a valid number"))?;
    if count >= 1 {
        Ok(count)
    } else {
        Err(ValidationError::new("Must supply at least 1 product"))
    }
}

/// Trims the name and rejects blanks and case-insensitive duplicates.
pub fn validate_product_name(input: &str, existing: &[Product]) -> ValidationResult<String> {
    let name = input.trim();
    if name.is_empty() {
        return Err(ValidationError::new("Product name cannot be empty"));
    }
    if existing
        .iter()
        .any(|product| product.name.eq_ignore_ascii_case(name))
    {
        return Err(ValidationError::new(format!(
            "Product `{}` was already entered",
            name
        )));
    }
    Ok(name.to_string())
}

/// Lowest sensible unit price for `min_total`:
/// `max(10, min_total / (max_bags * orders_per_month * 3))`, rounded up to
/// the next minor unit.
pub fn min_sensible_price(min_total: Money, config: &GeneratorConfig) -> Money {
    let divisor = i64::from(config.max_bags)
        * i64::from(config.orders_per_month)
        * PRICE_FLOOR_FACTOR;
    let scaled = if divisor > 0 {
        (min_total.minor() + divisor - 1) / divisor
    } else {
        0
    };
    Money::from_minor(scaled.max(Money::from_units(MIN_PRICE_UNITS).minor()))
}

pub fn validate_price(
    input: &str,
    min_total: Money,
    config: &GeneratorConfig,
) -> ValidationResult<Money> {
    let price = Money::parse(input).map_err(|_| ValidationError::new("Enter a valid number"))?;
    if !price.is_positive() {
        return Err(ValidationError::new("Price must be greater than 0"));
    }
    let floor = min_sensible_price(min_total, config);
    if price < floor {
        return Err(ValidationError::new(format!(
            "Price too small - should be at least {} based on your total range",
            floor
        )));
    }
    check_ceiling(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds() {
        assert_eq!(parse_month(" 12 "), Ok(12));
        assert!(parse_month("0").is_err());
        assert!(parse_month("13").is_err());
        assert!(parse_month("march").is_err());
    }

    #[test]
    fn range_must_not_be_inverted() {
        assert!(validate_month_range(1, 2024, 12, 2024).is_ok());
        assert!(validate_month_range(6, 2024, 6, 2024).is_ok());
        let err = validate_month_range(2, 2025, 1, 2025).unwrap_err();
        assert_eq!(err.message, "Start date must be before end date");
    }

    #[test]
    fn totals_must_be_positive_and_ordered() {
        let low = Money::from_units(800);
        let high = Money::from_units(1_200);
        assert!(validate_total_range(low, high).is_ok());
        assert!(validate_total_range(low, low).is_ok());
        assert!(validate_total_range(high, low).is_err());
        assert!(validate_total_range(Money::ZERO, high).is_err());
        assert!(parse_amount("-5").is_err());
        assert_eq!(parse_amount("1,000"), Ok(Money::from_units(1_000)));
    }

    #[test]
    fn product_names_are_unique_and_present() {
        let existing = vec![Product::new("Maize", Money::from_units(50))];
        assert!(validate_product_name("  ", &existing).is_err());
        assert!(validate_product_name("maize", &existing).is_err());
        assert_eq!(validate_product_name(" Beans ", &existing), Ok("Beans".into()));
        assert!(parse_product_count("0").is_err());
    }

    #[test]
    fn price_floor_follows_total_range() {
        let config = GeneratorConfig::default();
        // 100,000 / (24 * 2 * 3) = 694.44...
        let floor = min_sensible_price(Money::from_units(100_000), &config);
        assert_eq!(floor, Money::from_minor(69_445));
        assert_eq!(
            min_sensible_price(Money::from_units(800), &config),
            Money::from_units(10)
        );
        assert!(validate_price("694.44", Money::from_units(100_000), &config).is_err());
        assert!(validate_price("694.45", Money::from_units(100_000), &config).is_ok());
        assert!(validate_price("0", Money::from_units(800), &config).is_err());
        assert!(validate_price("9.99", Money::from_units(800), &config).is_err());
    }

    #[test]
    fn oversized_amounts_are_rejected() {
        let config = GeneratorConfig::default();
        let min = Money::from_units(800);
        assert!(validate_price("10000000000000000", min, &config).is_err());
        assert!(validate_price("1,000,000,000,000", min, &config).is_ok());
        assert!(parse_amount("1000000000001").is_err());
        let ceiling = Money::from_units(MAX_AMOUNT_UNITS);
        assert!(validate_total_range(min, ceiling).is_ok());
        assert!(validate_total_range(min, ceiling + Money::from_minor(1)).is_err());
    }
}
