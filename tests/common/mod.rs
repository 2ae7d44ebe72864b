#![allow(dead_code)]

use receipt_core::{GeneratorConfig, Money, Product, ReceiptGenerator, TotalRange, YearMonth};

pub fn seeded_generator(seed: u64) -> ReceiptGenerator {
    generator_with(GeneratorConfig::default(), seed)
}

pub fn generator_with(config: GeneratorConfig, seed: u64) -> ReceiptGenerator {
    ReceiptGenerator::new(GeneratorConfig {
        seed: Some(seed),
        ..config
    })
    .expect("valid generator config")
}

pub fn product(name: &str, units: i64) -> Product {
    Product::new(name, Money::from_units(units))
}

pub fn total_range(min_units: i64, max_units: i64) -> TotalRange {
    TotalRange::new(Money::from_units(min_units), Money::from_units(max_units))
}

pub fn month(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).expect("calendar month")
}
