//! Saving rendered receipts to disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{tmp_path, write_atomic};
use crate::domain::{MonthRange, Product};
use crate::errors::Result;

const FILE_PREFIX: &str = "Receipt_orders";
const FILE_EXTENSION: &str = "txt";

/// `Receipt_orders_<business>_<products>_<sm>_<sy>_to_<em>_<ey>.txt`
pub fn receipt_file_name(business: &str, products: &[Product], months: &MonthRange) -> String {
    let product_names = products
        .iter()
        .map(|product| product.name.as_str())
        .collect::<Vec<_>>()
        .join("_");
    let raw = format!(
        "{}_{}_{}_{}_{}_to_{}_{}.{}",
        FILE_PREFIX,
        business,
        product_names,
        months.start.month(),
        months.start.year(),
        months.end.month(),
        months.end.year(),
        FILE_EXTENSION
    );
    sanitize_file_name(&raw)
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            ch if ch.is_control() => '-',
            ch => ch,
        })
        .collect()
}

/// Writes `content` to `dir/file_name` through a temporary sibling file.
pub fn save_receipts(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(file_name);
    let tmp = tmp_path(&path);
    write_atomic(&tmp, content)?;
    fs::rename(&tmp, &path)?;
    tracing::info!(path = %path.display(), bytes = content.len(), "saved receipts");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::YearMonth;
    use crate::money::Money;
    use tempfile::TempDir;

    fn months() -> MonthRange {
        MonthRange::new(
            YearMonth::new(2024, 1).unwrap(),
            YearMonth::new(2024, 12).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn name_joins_products_and_bounds() {
        let products = vec![
            Product::new("Maize", Money::from_units(50)),
            Product::new("Beans", Money::from_units(90)),
        ];
        assert_eq!(
            receipt_file_name("Baba Sandra", &products, &months()),
            "Receipt_orders_Baba Sandra_Maize_Beans_1_2024_to_12_2024.txt"
        );
    }

    #[test]
    fn separators_are_replaced() {
        let products = vec![Product::new("Rice 1/2", Money::from_units(50))];
        let name = receipt_file_name("A:B", &products, &months());
        assert_eq!(name, "Receipt_orders_A-B_Rice 1-2_1_2024_to_12_2024.txt");
    }

    #[test]
    fn save_writes_file() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join("out");
        let path = save_receipts(&dir, "r.txt", "hello").expect("save");
        assert_eq!(fs::read_to_string(&path).expect("read"), "hello");
        assert!(!tmp_path(&path).exists());
    }
}
