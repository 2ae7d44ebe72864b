use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::{ReceiptError, Result};
use crate::generator::Tier;

const DEFAULT_DIR_NAME: &str = ".receipt_core";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";
pub const HOME_ENV: &str = "RECEIPT_CORE_HOME";
pub const SEED_ENV: &str = "RECEIPT_CORE_SEED";
/// Segments shorter than a day cannot hold an order date.
pub const MAX_ORDERS_PER_MONTH: u32 = 28;

/// Lowest quantity a slot may be sampled or seeded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BagFloor {
    /// Slots start at `min_bags`.
    #[default]
    MinBags,
    /// Slots start at a single bag.
    One,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub business_name: String,
    pub currency_label: String,
    pub min_bags: u32,
    pub max_bags: u32,
    pub orders_per_month: u32,
    pub bag_floor: BagFloor,
    pub attempts_per_tier: u32,
    pub date_attempts: u32,
    pub tiers: Vec<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            business_name: "Baba Sandra".into(),
            currency_label: "KES".into(),
            min_bags: 8,
            max_bags: 24,
            orders_per_month: 2,
            bag_floor: BagFloor::MinBags,
            attempts_per_tier: 500,
            date_attempts: 100,
            tiers: Tier::defaults(),
            seed: None,
            output_dir: None,
        }
    }
}

impl GeneratorConfig {
    /// Quantity a slot starts from, per [`BagFloor`].
    pub fn slot_floor(&self) -> u32 {
        match self.bag_floor {
            BagFloor::MinBags => self.min_bags,
            BagFloor::One => 1,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_bags == 0 {
            return Err(invalid("min_bags must be at least 1"));
        }
        if self.min_bags > self.max_bags {
            return Err(invalid(format!(
                "min_bags ({}) exceeds max_bags ({})",
                self.min_bags, self.max_bags
            )));
        }
        if self.orders_per_month == 0 || self.orders_per_month > MAX_ORDERS_PER_MONTH {
            return Err(invalid(format!(
                "orders_per_month must be between 1 and {}",
                MAX_ORDERS_PER_MONTH
            )));
        }
        let distinct_quantities = self.max_bags - self.slot_floor() + 1;
        if distinct_quantities < self.orders_per_month {
            return Err(invalid(format!(
                "{} orders per month need at least {} distinct bag counts, only {} available",
                self.orders_per_month, self.orders_per_month, distinct_quantities
            )));
        }
        if self.attempts_per_tier == 0 {
            return Err(invalid("attempts_per_tier must be at least 1"));
        }
        if self.tiers.is_empty() {
            return Err(invalid("at least one search tier is required"));
        }
        if let Some(tier) = self.tiers.iter().find(|tier| tier.range_buffer.minor() < 0) {
            return Err(invalid(format!(
                "tier `{}` has a negative range buffer",
                tier.name
            )));
        }
        if self.currency_label.trim().is_empty() {
            return Err(invalid("currency_label cannot be empty"));
        }
        Ok(())
    }

    /// Applies `RECEIPT_CORE_SEED` when it is set to an integer.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(raw) = env::var_os(SEED_ENV) {
            let raw = raw.to_string_lossy();
            let seed = raw.trim().parse::<u64>().map_err(|_| {
                invalid(format!("{} must be an unsigned integer, got `{}`", SEED_ENV, raw))
            })?;
            self.seed = Some(seed);
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ReceiptError {
    ReceiptError::Config(message.into())
}

/// Loads and saves [`GeneratorConfig`] as JSON under the application directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Reads the stored config, falling back to defaults when none exists.
    pub fn load(&self) -> Result<GeneratorConfig> {
        let config = if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data)?
        } else {
            GeneratorConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &GeneratorConfig) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Application data directory, `$RECEIPT_CORE_HOME` or `~/.receipt_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
