use anyhow::{Context, Result};
use paycycle_core::BillBook;
use paycycle_store::DirStore;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// `$PAYCYCLE_HOME`, or `~/.paycycle`.
pub fn paycycle_home() -> Result<PathBuf> {
    if let Some(custom) = std::env::var_os("PAYCYCLE_HOME") {
        return Ok(PathBuf::from(custom));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".paycycle"))
}

pub fn ensure_paycycle_home() -> Result<PathBuf> {
    let dir = paycycle_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Snapshot store at the configured directory.
pub fn snapshot_store(cfg: &Config) -> Result<DirStore> {
    Ok(DirStore::new(cfg.store_dir(&paycycle_home()?)))
}

pub fn bills_path() -> Result<PathBuf> {
    Ok(ensure_paycycle_home()?.join("bills.json"))
}

/// Working bill set; the default household when nothing has been saved yet.
pub fn read_book(path: &Path) -> Result<BillBook> {
    if !path.exists() {
        return Ok(BillBook::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_book(path: &Path, book: &BillBook) -> Result<()> {
    let json = serde_json::to_string_pretty(book)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn load_book() -> Result<BillBook> {
    read_book(&bills_path()?)
}

pub fn save_book(book: &BillBook) -> Result<()> {
    write_book(&bills_path()?, book)
}
