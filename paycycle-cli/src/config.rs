use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_paycycle_home;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub budget: BudgetSection,
    #[serde(default)]
    pub income: IncomeSection,
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSection {
    /// IANA timezone used to decide what "today" is
    pub timezone: String,
    /// Default monthly extra payment for the snowball tool
    pub extra_payment: f64,
}

/// Default income per pay window. Rent only counts toward the first window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeSection {
    pub pay: f64,
    pub rent: f64,
    pub other: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreSection {
    /// Snapshot directory (default: <home>/snapshots)
    pub dir: Option<PathBuf>,
}

impl Default for BudgetSection {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
            extra_payment: 100.0,
        }
    }
}

impl Default for IncomeSection {
    fn default() -> Self {
        Self {
            pay: 2449.0,
            rent: 2100.0,
            other: 0.0,
        }
    }
}

impl Config {
    pub fn store_dir(&self, home: &Path) -> PathBuf {
        self.store
            .dir
            .clone()
            .unwrap_or_else(|| home.join("snapshots"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_paycycle_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    read_config(&config_path()?)
}

pub fn read_config(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let cfg = read_config(&temp.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.store_dir(temp.path()), temp.path().join("snapshots"));
    }

    #[test]
    fn test_partial_config() {
        let temp = TempDir::new().unwrap();
        let p = temp.path().join("config.toml");
        fs::write(&p, "[income]\npay = 2600.0\n").unwrap();
        let cfg = read_config(&p).unwrap();
        assert_eq!(cfg.income.pay, 2600.0);
        assert_eq!(cfg.income.rent, 2100.0);
        assert_eq!(cfg.budget.timezone, "America/Chicago");
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.store.dir = Some(PathBuf::from("/data/budget"));
        let s = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back, cfg);
    }
}
