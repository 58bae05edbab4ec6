//! Callsheet configuration.
//!
//! Loaded from `~/.callsheet/config.toml`. Every key is optional;
//! a missing file means the defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-diem paid to internal staff per travel day when a job sets none.
pub const DEFAULT_PER_DIEM_RATE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// VAT percentage applied on top of net revenue.
pub const DEFAULT_VAT_RATE: Decimal = Decimal::from_parts(22, 0, 0, false, 0);

/// Worked days allowed per ISO week before a rest day is owed.
pub const DEFAULT_WEEKLY_WORK_LIMIT: u32 = 5;

/// Business settings consumed by the cost composer and the rest evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub per_diem_rate: Decimal,

    /// Percent, e.g. `22` for 22%.
    pub vat_rate: Decimal,

    pub weekly_work_limit: u32,

    /// Flat surcharge per job, keyed by fee zone.
    pub zone_fees: BTreeMap<String, Decimal>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            per_diem_rate: DEFAULT_PER_DIEM_RATE,
            vat_rate: DEFAULT_VAT_RATE,
            weekly_work_limit: DEFAULT_WEEKLY_WORK_LIMIT,
            zone_fees: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from `~/.callsheet/config.toml`, or defaults if it doesn't exist.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.callsheet/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".callsheet").join("config.toml"))
    }

    /// The surcharge for a fee zone. Unknown zones cost nothing.
    pub fn zone_fee(&self, zone: &str) -> Decimal {
        self.zone_fees.get(zone).copied().unwrap_or_default()
    }
}
