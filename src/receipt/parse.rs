//! Reads rendered month blocks back into numbers.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use super::render::SEPARATOR;
use crate::money::parse_whole;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, found `{found}`")]
    Unexpected {
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("month block is missing its {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub product: String,
    pub quantity: u32,
    pub price: i64,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOrder {
    pub date: NaiveDate,
    pub lines: Vec<ParsedLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMonth {
    pub title: String,
    pub orders: Vec<ParsedOrder>,
    pub currency: String,
    /// Whole currency units as rendered.
    pub total: i64,
}

impl ParsedMonth {
    /// Per product quantities in order-slot order.
    pub fn quantities(&self) -> BTreeMap<String, Vec<u32>> {
        let mut out: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        for order in &self.orders {
            for line in &order.lines {
                out.entry(line.product.clone())
                    .or_default()
                    .push(line.quantity);
            }
        }
        out
    }

    pub fn days(&self) -> Vec<u32> {
        use chrono::Datelike;
        self.orders.iter().map(|order| order.date.day()).collect()
    }
}

/// Splits rendered text into month blocks.
pub fn split_months(text: &str) -> Vec<&str> {
    text.split(SEPARATOR)
        .filter(|block| !block.trim().is_empty())
        .collect()
}

/// Parses one block as produced by [`super::render_month`]. The leading
/// separator line is optional.
pub fn parse_month_block(block: &str) -> Result<ParsedMonth, ParseError> {
    let mut title = None;
    let mut orders: Vec<ParsedOrder> = Vec::new();
    let mut total = None;

    for (idx, raw) in block.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end();
        if line.is_empty() || line == SEPARATOR {
            continue;
        }
        if let Some(rest) = line.strip_prefix("**Total for ") {
            let body = rest
                .strip_suffix("**")
                .ok_or_else(|| unexpected(line_no, "closing `**`", line))?;
            let (_, amount) = body
                .rsplit_once(": ")
                .ok_or_else(|| unexpected(line_no, "`: <currency> <total>`", line))?;
            let (currency, value) = amount
                .split_once(' ')
                .ok_or_else(|| unexpected(line_no, "currency and total", line))?;
            let value = parse_whole(value).ok_or_else(|| unexpected(line_no, "total", line))?;
            total = Some((currency.to_string(), value));
        } else if let Some(rest) = line.strip_prefix("Date Issued: ") {
            let date = NaiveDate::parse_from_str(rest.trim(), "%d/%m/%Y")
                .map_err(|_| unexpected(line_no, "dd/mm/yyyy date", line))?;
            orders.push(ParsedOrder {
                date,
                lines: Vec::new(),
            });
        } else if let Some(inner) = line.strip_prefix("**").and_then(|l| l.strip_suffix("**")) {
            title = Some(inner.to_string());
        } else {
            let parsed = parse_line(line).ok_or_else(|| {
                unexpected(line_no, "`<product>: <qty> bags @ <price> = <currency> <amount>`", line)
            })?;
            let order = orders
                .last_mut()
                .ok_or_else(|| unexpected(line_no, "`Date Issued:` before items", line))?;
            order.lines.push(parsed);
        }
    }

    let title = title.ok_or(ParseError::Missing("title"))?;
    let (currency, total) = total.ok_or(ParseError::Missing("total"))?;
    if orders.is_empty() {
        return Err(ParseError::Missing("orders"));
    }
    Ok(ParsedMonth {
        title,
        orders,
        currency,
        total,
    })
}

fn parse_line(line: &str) -> Option<ParsedLine> {
    let (head, tail) = line.rsplit_once(" bags @ ")?;
    let (product, quantity) = head.rsplit_once(": ")?;
    let (price, amount) = tail.split_once(" = ")?;
    let (_, amount) = amount.split_once(' ')?;
    Some(ParsedLine {
        product: product.to_string(),
        quantity: quantity.trim().parse().ok()?,
        price: parse_whole(price)?,
        amount: parse_whole(amount)?,
    })
}

fn unexpected(line: usize, expected: &'static str, found: &str) -> ParseError {
    ParseError::Unexpected {
        line,
        expected,
        found: found.to_string(),
    }
}
