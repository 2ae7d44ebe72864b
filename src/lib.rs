#![doc(test(attr(deny(warnings))))]

//! Receipt Core generates monthly purchase receipts for a small trading
//! business: per-product bag quantities whose monthly total lands in a chosen
//! range, spread over weekday order dates, without repeating totals.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod generator;
pub mod money;
pub mod receipt;
pub mod storage;
pub mod utils;
pub mod validation;

pub use config::{BagFloor, ConfigManager, GeneratorConfig};
pub use domain::{MonthRange, Product, TotalRange, YearMonth};
pub use errors::ReceiptError;
pub use generator::{Allocation, AllocationSource, MonthlyReceipt, ReceiptGenerator, Tier};
pub use money::Money;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Receipt Core tracing initialized.");
    });
}
