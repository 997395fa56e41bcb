use anyhow::{Context, Result};
use paycycle_core::time::parse_tz;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::{Config, config_path, load_config, save_config};

fn prompt(label: &str, current: &str) -> Result<String> {
    print!("{} [{}]: ", label, current);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    let s = s.trim();
    Ok(if s.is_empty() { current.to_string() } else { s.to_string() })
}

fn prompt_amount(label: &str, current: f64) -> Result<f64> {
    let s = prompt(label, &format!("{current:.2}"))?;
    s.replace(['$', ','], "")
        .parse()
        .with_context(|| format!("{label}: not a number: {s}"))
}

pub fn run_setup() -> Result<()> {
    println!("Paycycle setup (press enter to keep the current value)\n");
    let mut cfg: Config = load_config()?;

    let tz = prompt("Timezone (IANA)", &cfg.budget.timezone)?;
    parse_tz(&tz)?;
    cfg.budget.timezone = tz;

    cfg.income.pay = prompt_amount("Pay per paycheck", cfg.income.pay)?;
    cfg.income.rent = prompt_amount("Rent income (first paycheck)", cfg.income.rent)?;
    cfg.income.other = prompt_amount("Other income per paycheck", cfg.income.other)?;
    cfg.budget.extra_payment = prompt_amount("Snowball extra payment", cfg.budget.extra_payment)?;

    let current_dir = cfg
        .store
        .dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let dir = prompt("Snapshot directory (blank for default)", &current_dir)?;
    cfg.store.dir = (!dir.is_empty()).then(|| PathBuf::from(dir));

    save_config(&cfg)?;

    println!("\nWrote {}", config_path()?.display());
    println!("\nNext:");
    println!("- paycycle bills list");
    println!("- paycycle plan --pay-date <YYYY-MM-DD>");
    println!("- paycycle snowball --import-loans");

    Ok(())
}
