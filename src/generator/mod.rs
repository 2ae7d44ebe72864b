//! Monthly quantity, total and date generation.
//!
//! [`ReceiptGenerator`] owns the random source and the [`UsedTotalsLedger`]
//! for one run. Quantities come from the tiered [`search`] first and from the
//! [`fallback`] allocator when every tier is exhausted, so generation always
//! produces a result.

pub mod dates;
pub mod fallback;
pub mod ledger;
pub mod search;

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::GeneratorConfig;
use crate::domain::{Product, TotalRange, YearMonth};
use crate::errors::{ReceiptError, Result};
use crate::money::Money;

pub use ledger::{UsedTotalsLedger, MAX_USES_PER_TOTAL};
pub use search::Tier;

/// Per-slot sampling bounds derived from [`GeneratorConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotBounds {
    pub floor: u32,
    pub max_bags: u32,
    pub slots: u32,
}

impl SlotBounds {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            floor: config.slot_floor(),
            max_bags: config.max_bags,
            slots: config.orders_per_month,
        }
    }

    pub fn distinct_values(&self) -> u32 {
        (self.max_bags + 1).saturating_sub(self.floor)
    }
}

/// Where an allocation's quantities came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationSource {
    /// Accepted by the named search tier.
    Search { tier: String },
    /// Built by the fallback allocator. `shortfall` is how far the total sits
    /// below the range minimum, zero otherwise.
    Fallback { target: Money, shortfall: Money },
}

/// Quantities for one month, keyed by product name, one entry per order slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub quantities: BTreeMap<String, Vec<u32>>,
    pub total: Money,
    pub source: AllocationSource,
}

impl Allocation {
    pub fn within(&self, range: &TotalRange) -> bool {
        range.contains(self.total)
    }

    /// Whether the 0-decimal rendering of the total reads back as the same
    /// amount. Only whole-unit totals do.
    pub fn renders_exactly(&self) -> bool {
        self.total.is_whole()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, AllocationSource::Fallback { .. })
    }

    /// Quantities for `product`, one per order slot.
    pub fn slots(&self, product: &str) -> &[u32] {
        self.quantities
            .get(product)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// One generated month: order days and quantities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyReceipt {
    pub month: YearMonth,
    pub dates: Vec<u32>,
    pub allocation: Allocation,
}

/// Generates months for a single run. Two generators built from the same
/// config and seed produce identical months.
pub struct ReceiptGenerator<R: Rng = ChaCha8Rng> {
    config: GeneratorConfig,
    rng: R,
    ledger: UsedTotalsLedger,
}

impl ReceiptGenerator<ChaCha8Rng> {
    /// Seeds from `config.seed`, or from entropy when unset.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> ReceiptGenerator<R> {
    pub fn with_rng(config: GeneratorConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            ledger: UsedTotalsLedger::new(),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn ledger(&self) -> &UsedTotalsLedger {
        &self.ledger
    }

    /// Picks quantities whose total lands in `range`, searching tier by tier
    /// and falling back to [`fallback::distribute`] once all are exhausted.
    pub fn generate_quantities(&mut self, products: &[Product], range: &TotalRange) -> Allocation {
        let bounds = SlotBounds::from_config(&self.config);
        if let Some(allocation) = search::search(
            &mut self.rng,
            products,
            range,
            &self.config.tiers,
            bounds,
            self.config.attempts_per_tier,
            &mut self.ledger,
        ) {
            return allocation;
        }
        tracing::info!(
            min = %range.min,
            max = %range.max,
            "search tiers exhausted, using fallback allocation"
        );
        fallback::distribute(&mut self.rng, products, range, bounds, &mut self.ledger)
    }

    pub fn generate_dates(&mut self, month: YearMonth) -> Vec<u32> {
        dates::generate_dates(
            &mut self.rng,
            month,
            self.config.orders_per_month,
            self.config.date_attempts,
        )
    }

    /// Same as [`generate_dates`](Self::generate_dates) for raw year/month
    /// values. Rejects months that are not on the calendar.
    pub fn generate_dates_for(&mut self, year: i32, month: u32) -> Result<Vec<u32>> {
        let month = YearMonth::new(year, month).ok_or_else(|| {
            ReceiptError::InvalidInput(format!("{}-{:02} is not a calendar month", year, month))
        })?;
        Ok(self.generate_dates(month))
    }

    pub fn generate_month(
        &mut self,
        month: YearMonth,
        products: &[Product],
        range: &TotalRange,
    ) -> MonthlyReceipt {
        let dates = self.generate_dates(month);
        let allocation = self.generate_quantities(products, range);
        MonthlyReceipt {
            month,
            dates,
            allocation,
        }
    }
}

/// Whether two slots of one product would bill the same amount. At a
/// positive unit price that happens exactly when the quantities match, and
/// quantities are also what keeps zero-priced slots apart, so the price
/// never needs multiplying (saturated products would compare equal).
pub(crate) fn amounts_collide(first: u32, second: u32) -> bool {
    first == second
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> ReceiptGenerator {
        ReceiptGenerator::new(GeneratorConfig {
            seed: Some(seed),
            ..GeneratorConfig::default()
        })
        .expect("valid config")
    }

    #[test]
    fn same_seed_same_months() {
        let products = vec![
            Product::new("Maize", Money::from_units(50)),
            Product::new("Beans", Money::from_units(90)),
        ];
        let range = TotalRange::new(Money::from_units(3_000), Money::from_units(4_000));
        let month = YearMonth::new(2025, 3).unwrap();
        let mut first = seeded(42);
        let mut second = seeded(42);
        for _ in 0..6 {
            assert_eq!(
                first.generate_month(month, &products, &range),
                second.generate_month(month, &products, &range)
            );
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config = GeneratorConfig {
            orders_per_month: 0,
            ..GeneratorConfig::default()
        };
        assert!(ReceiptGenerator::new(config).is_err());
    }

    #[test]
    fn invalid_month_is_an_input_error() {
        let mut generator = seeded(1);
        assert!(matches!(
            generator.generate_dates_for(2025, 13),
            Err(ReceiptError::InvalidInput(_))
        ));
        assert_eq!(generator.generate_dates_for(2024, 2).unwrap().len(), 2);
    }

    #[test]
    fn slots_collide_only_on_equal_quantities() {
        assert!(amounts_collide(3, 3));
        assert!(!amounts_collide(3, 4));
    }

    #[test]
    fn oversized_price_does_not_overflow() {
        let products = vec![Product::new("Gold", Money::from_minor(i64::MAX / 4))];
        let range = TotalRange::new(Money::from_units(800), Money::from_units(1_200));
        let mut generator = seeded(13);
        let allocation = generator.generate_quantities(&products, &range);
        assert!(allocation.is_fallback());
        let pair = allocation.slots("Gold");
        assert_eq!(pair.len(), 2);
        assert_ne!(pair[0], pair[1]);
    }

    #[test]
    fn fractional_totals_do_not_render_exactly() {
        let allocation = Allocation {
            quantities: BTreeMap::new(),
            total: Money::from_minor(48_750),
            source: AllocationSource::Search {
                tier: "strict".into(),
            },
        };
        assert!(!allocation.renders_exactly());
        let whole = Allocation {
            total: Money::from_units(488),
            ..allocation
        };
        assert!(whole.renders_exactly());
    }
}
