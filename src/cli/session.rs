use std::path::PathBuf;

use rand::Rng;

use super::output;
use super::prompt::{ask, Prompter};
use super::CliError;
use crate::config::GeneratorConfig;
use crate::domain::{MonthRange, Product, TotalRange};
use crate::generator::ReceiptGenerator;
use crate::receipt;
use crate::storage;
use crate::validation::{
    parse_amount, parse_month, parse_product_count, parse_year, validate_month_range,
    validate_price, validate_product_name, validate_total_range,
};

/// Operator answers for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInput {
    pub months: MonthRange,
    pub totals: TotalRange,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub months_generated: usize,
    pub fallback_months: usize,
    pub saved_to: Option<PathBuf>,
}

pub fn prompt_month_range<P: Prompter + ?Sized>(prompter: &mut P) -> Result<MonthRange, CliError> {
    output::section("Date Range Selection");
    loop {
        let start_month = ask(prompter, "Enter start month (1-12)", parse_month)?;
        let start_year = ask(prompter, "Enter start year (e.g., 2024)", parse_year)?;
        let end_month = ask(prompter, "Enter end month (1-12)", parse_month)?;
        let end_year = ask(prompter, "Enter end year (e.g., 2025)", parse_year)?;
        match validate_month_range(start_month, start_year, end_month, end_year) {
            Ok(range) => return Ok(range),
            Err(err) => output::error(format!("Invalid input: {}. Please try again.", err)),
        }
    }
}

pub fn prompt_total_range<P: Prompter + ?Sized>(prompter: &mut P) -> Result<TotalRange, CliError> {
    output::section("Monthly Total Range");
    loop {
        let min = ask(prompter, "Enter minimum monthly total amount", parse_amount)?;
        let max = ask(prompter, "Enter maximum monthly total amount", parse_amount)?;
        match validate_total_range(min, max) {
            Ok(range) => return Ok(range),
            Err(err) => output::error(err),
        }
    }
}

/// Product prices are checked against the minimum total, so the total range
/// is collected first.
pub fn prompt_products<P: Prompter + ?Sized>(
    prompter: &mut P,
    totals: &TotalRange,
    config: &GeneratorConfig,
) -> Result<Vec<Product>, CliError> {
    output::section("Product Information");
    let count = ask(
        prompter,
        "How many different products are being supplied?",
        parse_product_count,
    )?;
    let mut products: Vec<Product> = Vec::with_capacity(count);
    for idx in 1..=count {
        output::info(format!("Product #{}", idx));
        let name = ask(prompter, "Enter product name", |input| {
            validate_product_name(input, &products)
        })?;
        let price = ask(
            prompter,
            &format!("Enter price per unit of {}", name),
            |input| validate_price(input, totals.min, config),
        )?;
        products.push(Product::new(name, price));
    }
    Ok(products)
}

pub fn collect_input<P: Prompter + ?Sized>(
    prompter: &mut P,
    config: &GeneratorConfig,
) -> Result<SessionInput, CliError> {
    let months = prompt_month_range(prompter)?;
    let totals = prompt_total_range(prompter)?;
    let products = prompt_products(prompter, &totals, config)?;
    Ok(SessionInput {
        months,
        totals,
        products,
    })
}

/// Collects input, generates every month, previews the first one and saves
/// the whole text when the operator confirms.
pub fn run_session<P, R>(
    prompter: &mut P,
    generator: &mut ReceiptGenerator<R>,
) -> Result<SessionOutcome, CliError>
where
    P: Prompter + ?Sized,
    R: Rng,
{
    let config = generator.config().clone();
    println!("\n{} Receipt Order Generator", config.business_name);
    println!("-----------------------------------");

    let input = collect_input(prompter, &config)?;
    let (receipts, text) =
        receipt::generate_text(generator, &input.months, &input.products, &input.totals);

    let fallback_months = receipts
        .iter()
        .filter(|month| month.allocation.is_fallback())
        .count();
    for month in receipts
        .iter()
        .filter(|month| !month.allocation.within(&input.totals))
    {
        output::warning(format!(
            "{} {} total {} is outside {} - {}",
            month.month.name(),
            month.month.year(),
            month.allocation.total.format_whole(),
            input.totals.min.format_whole(),
            input.totals.max.format_whole()
        ));
    }

    output::section("Generated Receipts (first month)");
    if let Some(block) = receipt::first_block(&text) {
        println!("{}", block);
    }

    let mut saved_to = None;
    if prompter.confirm("Save all results to file?", false)? {
        let dir = config.output_dir.clone().unwrap_or_default();
        let file_name =
            storage::receipt_file_name(&config.business_name, &input.products, &input.months);
        let path = storage::save_receipts(&dir, &file_name, &text)?;
        output::success(format!("Receipts saved to '{}'", path.display()));
        output::success("Generation complete!");
        saved_to = Some(path);
    }

    Ok(SessionOutcome {
        months_generated: receipts.len(),
        fallback_months,
        saved_to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::prompt::ScriptPrompter;
    use crate::money::Money;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn collects_input_with_retries() {
        let script = "\
2
2025
1
2025
3
2025
3
2025
1200
800
800
1200
0
1
Maize
5
50
";
        let mut prompter = ScriptPrompter::new(Cursor::new(script));
        let input = collect_input(&mut prompter, &GeneratorConfig::default()).expect("input");
        assert_eq!(input.months.month_count(), 1);
        assert_eq!(input.months.start.month(), 3);
        assert_eq!(input.totals.min, Money::from_units(800));
        assert_eq!(input.totals.max, Money::from_units(1_200));
        assert_eq!(
            input.products,
            vec![Product::new("Maize", Money::from_units(50))]
        );
    }

    #[test]
    fn session_saves_when_confirmed() {
        let temp = TempDir::new().expect("temp dir");
        let config = GeneratorConfig {
            seed: Some(99),
            output_dir: Some(temp.path().to_path_buf()),
            ..GeneratorConfig::default()
        };
        let mut generator = ReceiptGenerator::new(config).expect("generator");
        let script = "1\n2024\n3\n2024\n800\n1200\n1\nMaize\n50\ny\n";
        let mut prompter = ScriptPrompter::new(Cursor::new(script));
        let outcome = run_session(&mut prompter, &mut generator).expect("session");

        assert_eq!(outcome.months_generated, 3);
        let path = outcome.saved_to.expect("saved");
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("Receipt_orders_Baba Sandra_Maize_1_2024_to_3_2024.txt")
        );
        let text = std::fs::read_to_string(path).expect("read");
        assert_eq!(receipt::split_months(&text).len(), 3);
        assert!(text.contains("**JANUARY 2024**"));
    }

    #[test]
    fn session_skips_save_when_declined() {
        let mut generator = ReceiptGenerator::new(GeneratorConfig {
            seed: Some(5),
            ..GeneratorConfig::default()
        })
        .expect("generator");
        let script = "6\n2025\n6\n2025\n800\n1200\n1\nMaize\n50\nn\n";
        let mut prompter = ScriptPrompter::new(Cursor::new(script));
        let outcome = run_session(&mut prompter, &mut generator).expect("session");
        assert_eq!(outcome.saved_to, None);
        assert_eq!(outcome.months_generated, 1);
    }
}
