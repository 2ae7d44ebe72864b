use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A product supplied in bags at a fixed unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub unit_price: Money,
}

impl Product {
    pub fn new(name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            name: name.into(),
            unit_price,
        }
    }
}

/// Inclusive range the monthly total should land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalRange {
    pub min: Money,
    pub max: Money,
}

impl TotalRange {
    pub fn new(min: Money, max: Money) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: Money) -> bool {
        self.min <= value && value <= self.max
    }

    /// Upper bound widened by `buffer`.
    pub fn contains_with_buffer(&self, value: Money, buffer: Money) -> bool {
        self.min <= value && value <= self.max + buffer
    }
}
