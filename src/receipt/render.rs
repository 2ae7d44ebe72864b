use std::fmt;

use crate::domain::Product;
use crate::generator::MonthlyReceipt;

pub const SEPARATOR: &str =
    "------------------------------------------------------------------------";

/// Renders one month: a header, one block per order and the monthly total.
pub fn render_month(receipt: &MonthlyReceipt, products: &[Product], currency: &str) -> String {
    MonthBlock {
        receipt,
        products,
        currency,
    }
    .to_string()
}

struct MonthBlock<'a> {
    receipt: &'a MonthlyReceipt,
    products: &'a [Product],
    currency: &'a str,
}

impl fmt::Display for MonthBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = self.receipt.month;
        let title = format!("{} {}", month.name().to_uppercase(), month.year());

        writeln!(f, "{}", SEPARATOR)?;
        writeln!(f, "**{}**", title)?;
        writeln!(f)?;

        for (slot, day) in self.receipt.dates.iter().enumerate() {
            writeln!(
                f,
                "Date Issued: {:02}/{:02}/{}",
                day,
                month.month(),
                month.year()
            )?;
            for product in self.products {
                let Some(qty) = self.receipt.allocation.slots(&product.name).get(slot).copied()
                else {
                    continue;
                };
                writeln!(
                    f,
                    "{}: {} bags @ {} = {} {}",
                    product.name,
                    qty,
                    product.unit_price.format_whole(),
                    self.currency,
                    product.unit_price.times(qty).format_whole()
                )?;
            }
            writeln!(f)?;
        }

        writeln!(
            f,
            "**Total for {}: {} {}**",
            title,
            self.currency,
            self.receipt.allocation.total.format_whole()
        )?;
        writeln!(f)
    }
}

/// Concatenates the blocks of every month.
pub fn render_receipts(receipts: &[MonthlyReceipt], products: &[Product], currency: &str) -> String {
    receipts
        .iter()
        .map(|receipt| render_month(receipt, products, currency))
        .collect()
}

/// Text of the first month block, without its separator line.
pub fn first_block(text: &str) -> Option<&str> {
    text.split(SEPARATOR)
        .map(|block| block.trim_start_matches('\n'))
        .find(|block| !block.trim().is_empty())
}
