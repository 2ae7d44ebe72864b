use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use super::{amounts_collide, Allocation, AllocationSource, SlotBounds, UsedTotalsLedger};
use crate::domain::{Product, TotalRange};
use crate::money::Money;

/// No slot is ever corrected below a single bag.
const HARD_FLOOR: u32 = 1;

/// Allocates bags toward a random target inside `range` without retrying.
///
/// Every slot starts at `bounds.floor`; the money left before the target is
/// then spent product by product, in shuffled order, within each slot's
/// `max_bags` capacity. The reported total is what was actually allocated,
/// so it can miss the range when the price granularity or the capacity runs
/// out; the miss is carried in [`AllocationSource::Fallback`].
pub fn distribute<R: Rng + ?Sized>(
    rng: &mut R,
    products: &[Product],
    range: &TotalRange,
    bounds: SlotBounds,
    ledger: &mut UsedTotalsLedger,
) -> Allocation {
    let (low, high) = if range.min <= range.max {
        (range.min, range.max)
    } else {
        (range.max, range.min)
    };
    let target = Money::from_minor(rng.gen_range(low.minor()..=high.minor()));
    let mut remaining = target;

    let mut slots: Vec<Vec<u32>> = products
        .iter()
        .map(|product| {
            let seeded = vec![bounds.floor; bounds.slots as usize];
            remaining -= product.unit_price.times(bounds.floor * bounds.slots);
            seeded
        })
        .collect();

    let mut order: Vec<usize> = (0..products.len()).collect();
    order.shuffle(rng);
    for idx in order {
        if remaining <= Money::ZERO {
            break;
        }
        let price = products[idx].unit_price;
        let capacity: u32 = slots[idx]
            .iter()
            .map(|qty| bounds.max_bags.saturating_sub(*qty))
            .sum();
        let bags = capacity.min(remaining.affordable(price));
        if bags == 0 {
            continue;
        }
        spread(rng, &mut slots[idx], bags, bounds.max_bags);
        remaining -= price.times(bags);
    }

    for (product, product_slots) in products.iter().zip(slots.iter_mut()) {
        let added = separate_slots(product_slots);
        remaining -= product.unit_price.times(added);
    }

    let total = target - remaining;
    let shortfall = if total < range.min {
        range.min - total
    } else {
        Money::ZERO
    };
    if !range.contains(total) {
        tracing::warn!(
            target_total = %target,
            total = %total,
            min = %range.min,
            max = %range.max,
            "fallback allocation landed outside the requested range"
        );
    }
    ledger.record(total);

    let quantities: BTreeMap<String, Vec<u32>> = products
        .iter()
        .map(|product| product.name.clone())
        .zip(slots)
        .collect();
    Allocation {
        quantities,
        total,
        source: AllocationSource::Fallback { target, shortfall },
    }
}

/// Splits `bags` randomly across `slots` without pushing any past `max_bags`.
/// The caller guarantees `bags` fits the combined capacity.
fn spread<R: Rng + ?Sized>(rng: &mut R, slots: &mut [u32], mut bags: u32, max_bags: u32) {
    let len = slots.len();
    for idx in 0..len {
        let own = max_bags.saturating_sub(slots[idx]);
        let rest: u32 = slots[idx + 1..]
            .iter()
            .map(|qty| max_bags.saturating_sub(*qty))
            .sum();
        let low = bags.saturating_sub(rest);
        let high = bags.min(own);
        let add = if low >= high {
            high
        } else {
            rng.gen_range(low..=high)
        };
        slots[idx] += add;
        bags -= add;
    }
}

/// Makes every slot amount distinct by moving one bag from the earlier to the
/// later of two colliding slots. A pair already at a single bag gets one extra
/// bag on the later slot instead. Returns how many bags were added.
pub(crate) fn separate_slots(slots: &mut [u32]) -> u32 {
    let len = slots.len();
    let mut added = 0;
    let mut shifts_left = 4 * len * len;
    while let Some((first, second)) = first_collision(slots) {
        if shifts_left == 0 {
            break;
        }
        shifts_left -= 1;
        if slots[first] > HARD_FLOOR {
            slots[first] -= 1;
            slots[second] += 1;
        } else {
            slots[second] += 1;
            added += 1;
        }
    }
    // Shifting did not settle; grow colliding slots until each is unique.
    for idx in 1..len {
        while slots[..idx]
            .iter()
            .any(|&earlier| amounts_collide(earlier, slots[idx]))
        {
            slots[idx] += 1;
            added += 1;
        }
    }
    added
}

fn first_collision(slots: &[u32]) -> Option<(usize, usize)> {
    for second in 1..slots.len() {
        for first in 0..second {
            if amounts_collide(slots[first], slots[second]) {
                return Some((first, second));
            }
        }
    }
    None
}
