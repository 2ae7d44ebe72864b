use std::collections::HashMap;

use crate::money::Money;

/// How many times one monthly total may be produced under the strict tier.
pub const MAX_USES_PER_TOTAL: u32 = 2;

/// Run-scoped record of produced monthly totals.
///
/// Counts only grow. A long run over a narrow total range can use up every
/// reachable value, after which the strict tier never accepts and generation
/// relies on the relaxed tiers or the fallback.
#[derive(Debug, Clone, Default)]
pub struct UsedTotalsLedger {
    counts: HashMap<Money, u32>,
    previous: Option<Money>,
}

impl UsedTotalsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, value: Money) -> u32 {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, value: Money) {
        *self.counts.entry(value).or_insert(0) += 1;
    }

    pub fn previous(&self) -> Option<Money> {
        self.previous
    }

    pub fn set_previous(&mut self, value: Money) {
        self.previous = Some(value);
    }

    /// Books `value` as the latest monthly total.
    pub fn record(&mut self, value: Money) {
        self.increment(value);
        self.set_previous(value);
    }

    /// Strict-tier check: differs from the previous month and is under the cap.
    pub fn accepts(&self, value: Money) -> bool {
        self.previous != Some(value) && self.count(value) < MAX_USES_PER_TOTAL
    }

    /// Number of distinct totals seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn max_count(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }
}
