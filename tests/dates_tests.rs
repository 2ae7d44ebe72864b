mod common;

use chrono::{Datelike, NaiveDate, Weekday};
use common::{generator_with, month, seeded_generator};
use receipt_core::domain::days_in_month;
use receipt_core::generator::dates::segments;
use receipt_core::GeneratorConfig;

#[test]
fn leap_february_gets_one_date_per_half() {
    assert_eq!(days_in_month(2024, 2), 29);
    assert_eq!(segments(29, 2), vec![(1, 14), (15, 29)]);

    let mut generator = seeded_generator(5);
    for _ in 0..100 {
        let days = generator.generate_dates(month(2024, 2));
        assert_eq!(days.len(), 2);
        assert!((1..=14).contains(&days[0]), "{days:?}");
        assert!((15..=29).contains(&days[1]), "{days:?}");
    }
}

#[test]
fn dates_are_sorted_and_on_the_calendar() {
    for orders in 1..=5 {
        let config = GeneratorConfig {
            orders_per_month: orders,
            ..GeneratorConfig::default()
        };
        let mut generator = generator_with(config, u64::from(orders));
        for year in [1999, 2023, 2024, 2100] {
            for m in 1..=12 {
                let days = generator.generate_dates(month(year, m));
                assert_eq!(days.len(), orders as usize);
                assert!(days.windows(2).all(|pair| pair[0] < pair[1]), "{days:?}");
                let last = days_in_month(year, m);
                assert!(days.iter().all(|day| (1..=last).contains(day)));
            }
        }
    }
}

#[test]
fn default_dates_avoid_weekends() {
    let mut generator = seeded_generator(31);
    for m in 1..=12 {
        for day in generator.generate_dates(month(2025, m)) {
            let date = NaiveDate::from_ymd_opt(2025, m, day).unwrap();
            assert!(
                !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
                "{date} is a weekend"
            );
        }
    }
}

#[test]
fn raw_month_values_are_checked() {
    let mut generator = seeded_generator(1);
    assert!(generator.generate_dates_for(2025, 0).is_err());
    assert_eq!(generator.generate_dates_for(2023, 2).unwrap().len(), 2);
}
