use anyhow::{Context, Result, bail};
use clap::Subcommand;
use paycycle_store::{Snapshot, SnapshotStore, label_sort_key};
use std::cmp::Reverse;

use crate::config::load_config;
use crate::state::snapshot_store;

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List saved months, newest first
    List,

    /// Show a saved month (default: the most recent one)
    Show { label: Option<String> },
}

pub fn run(cmd: HistoryCommand) -> Result<()> {
    let cfg = load_config()?;
    let store = snapshot_store(&cfg)?;

    match cmd {
        HistoryCommand::List => {
            let labels = newest_first(&store);
            if labels.is_empty() {
                println!("No saved months yet ({}).", store.dir().display());
                return Ok(());
            }
            for label in labels {
                println!("{}", label);
            }
        }
        HistoryCommand::Show { label } => {
            let (label, snapshot) = resolve(&store, label)
                .with_context(|| format!("looking in {}", store.dir().display()))?;
            print_snapshot(&label, &snapshot);
        }
    }

    Ok(())
}

/// Stored labels, most recent month first.
pub fn newest_first(store: &impl SnapshotStore) -> Vec<String> {
    let mut labels = store.list_labels();
    labels.sort_by_key(|l| Reverse(label_sort_key(l)));
    labels
}

/// Load `label`, or the latest month when none is given.
pub fn resolve(store: &impl SnapshotStore, label: Option<String>) -> Result<(String, Snapshot)> {
    let Some(label) = label.or_else(|| store.latest()) else {
        bail!("No saved months yet.");
    };
    let Some(snapshot) = store.load(&label) else {
        bail!("No snapshot named {}", label);
    };
    Ok((label, snapshot))
}

fn print_snapshot(label: &str, snapshot: &Snapshot) {
    println!("# Archive: {}\n", label);

    if let Some(meta) = &snapshot.meta {
        println!("First pay date: {}", meta.pay_date);
        for (i, inc) in meta.incomes.iter().enumerate() {
            println!(
                "Pay #{}: pay ${:.2} | rent ${:.2} | other ${:.2}",
                i + 1,
                inc.pay,
                inc.rent,
                inc.other
            );
        }
        println!();
    }

    for b in &snapshot.bills {
        println!(
            "- {:<26} ${:>9.2}  {:<14} day {:>2}  {}",
            b.name, b.amount, b.category, b.due_day, b.frequency
        );
    }
    let total: f64 = snapshot.bills.iter().map(|b| b.amount).sum();
    println!("\n{} bills, ${:.2} total", snapshot.bills.len(), total);
}
