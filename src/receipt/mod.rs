//! Assembles a run of months into receipt text.

pub mod parse;
pub mod render;

use rand::Rng;

use crate::domain::{MonthRange, Product, TotalRange};
use crate::generator::{MonthlyReceipt, ReceiptGenerator};

pub use parse::{parse_month_block, split_months, ParseError, ParsedMonth};
pub use render::{first_block, render_month, render_receipts, SEPARATOR};

/// Generates every month of `months` in calendar order.
pub fn assemble<R: Rng>(
    generator: &mut ReceiptGenerator<R>,
    months: &MonthRange,
    products: &[Product],
    totals: &TotalRange,
) -> Vec<MonthlyReceipt> {
    let receipts: Vec<MonthlyReceipt> = months
        .months()
        .map(|month| generator.generate_month(month, products, totals))
        .collect();
    let fallbacks = receipts
        .iter()
        .filter(|receipt| receipt.allocation.is_fallback())
        .count();
    tracing::info!(
        months = receipts.len(),
        fallbacks,
        distinct_totals = generator.ledger().len(),
        "generated receipts"
    );
    receipts
}

/// Generates and renders every month of `months`.
pub fn generate_text<R: Rng>(
    generator: &mut ReceiptGenerator<R>,
    months: &MonthRange,
    products: &[Product],
    totals: &TotalRange,
) -> (Vec<MonthlyReceipt>, String) {
    let receipts = assemble(generator, months, products, totals);
    let currency = generator.config().currency_label.clone();
    let text = render_receipts(&receipts, products, &currency);
    (receipts, text)
}
