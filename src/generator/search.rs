use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{amounts_collide, Allocation, AllocationSource, SlotBounds, UsedTotalsLedger};
use crate::domain::{Product, TotalRange};
use crate::money::Money;

pub const DEFAULT_ATTEMPTS_PER_TIER: u32 = 500;

/// One set of acceptance rules for the randomized search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    pub allow_duplicate_totals: bool,
    /// Added to the upper end of the total range.
    pub range_buffer: Money,
}

impl Tier {
    pub fn new(name: impl Into<String>, allow_duplicate_totals: bool, range_buffer: Money) -> Self {
        Self {
            name: name.into(),
            allow_duplicate_totals,
            range_buffer,
        }
    }

    /// Strict, then duplicates allowed, then a widened upper bound.
    pub fn defaults() -> Vec<Tier> {
        vec![
            Tier::new("strict", false, Money::ZERO),
            Tier::new("relaxed-duplicates", true, Money::ZERO),
            Tier::new("extended-range", true, Money::from_units(5_000)),
        ]
    }

    fn accepts(&self, total: Money, range: &TotalRange, ledger: &UsedTotalsLedger) -> bool {
        if !range.contains_with_buffer(total, self.range_buffer) {
            return false;
        }
        self.allow_duplicate_totals || ledger.accepts(total)
    }
}

/// Runs up to `attempts` random trials per tier, in order, and books the
/// first accepted total in `ledger`. `None` means every tier was exhausted.
pub fn search<R: Rng + ?Sized>(
    rng: &mut R,
    products: &[Product],
    range: &TotalRange,
    tiers: &[Tier],
    bounds: SlotBounds,
    attempts: u32,
    ledger: &mut UsedTotalsLedger,
) -> Option<Allocation> {
    for tier in tiers {
        for attempt in 0..attempts {
            let (quantities, total) = sample_trial(rng, products, bounds);
            if tier.accepts(total, range, ledger) {
                ledger.record(total);
                tracing::debug!(tier = %tier.name, attempt, total = %total, "accepted monthly total");
                return Some(Allocation {
                    quantities,
                    total,
                    source: AllocationSource::Search {
                        tier: tier.name.clone(),
                    },
                });
            }
        }
        tracing::debug!(tier = %tier.name, attempts, "tier exhausted");
    }
    None
}

fn sample_trial<R: Rng + ?Sized>(
    rng: &mut R,
    products: &[Product],
    bounds: SlotBounds,
) -> (BTreeMap<String, Vec<u32>>, Money) {
    let mut quantities = BTreeMap::new();
    let mut total = Money::ZERO;
    for product in products {
        let slots = sample_slots(rng, bounds);
        total += product.unit_price.times(slots.iter().sum());
        quantities.insert(product.name.clone(), slots);
    }
    (quantities, total)
}

/// Samples one quantity per slot; a slot whose amount matches an earlier
/// slot is resampled. Needs `bounds.distinct_values() >= bounds.slots`.
pub(crate) fn sample_slots<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: SlotBounds,
) -> Vec<u32> {
    let mut slots: Vec<u32> = Vec::with_capacity(bounds.slots as usize);
    for _ in 0..bounds.slots {
        let mut qty = rng.gen_range(bounds.floor..=bounds.max_bags);
        while slots.iter().any(|&earlier| amounts_collide(earlier, qty)) {
            qty = rng.gen_range(bounds.floor..=bounds.max_bags);
        }
        slots.push(qty);
    }
    slots
}
