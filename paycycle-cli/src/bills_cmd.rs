use anyhow::{Context, Result, bail};
use clap::Subcommand;
use paycycle_core::{Bill, BillBook, Frequency};

use crate::state::{load_book, save_book};

#[derive(Subcommand, Debug)]
pub enum BillsCommand {
    /// Show the working bill set
    List,

    /// Quick-add a bill
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        amount: f64,

        /// HOUSING, LOANS, ENTERTAINMENT, SAVINGS, OTHER, ...
        #[arg(long, default_value = "OTHER")]
        category: String,

        /// Day of month (1-31); clamped in short months
        #[arg(long, default_value_t = 1)]
        due_day: u32,

        /// Monthly | "Every 2 Weeks" | Annual
        #[arg(long, default_value = "Monthly")]
        frequency: String,

        /// Month due (1-12), annual bills only
        #[arg(long)]
        month: Option<u32>,
    },

    /// Delete every bill with this name
    Delete { name: String },

    /// Change a bill's amount
    SetAmount {
        /// Bill name or #index from `bills list`
        bill: String,
        amount: f64,
    },

    /// Change a bill's due day
    SetDay {
        /// Bill name or #index from `bills list`
        bill: String,
        day: u32,
    },

    /// Replace the working set with the default household bills
    Reset,
}

pub fn run(cmd: BillsCommand) -> Result<()> {
    let mut book = load_book()?;

    match cmd {
        BillsCommand::List => {
            print_bills(&book);
            return Ok(());
        }
        BillsCommand::Add {
            name,
            amount,
            category,
            due_day,
            frequency,
            month,
        } => {
            let bill = build_bill(name, amount, category, due_day, &frequency, month)?;
            let name = bill.name.clone();
            book.add(bill)?;
            println!("Added {}", name);
        }
        BillsCommand::Delete { name } => {
            let removed = book.delete(&name)?;
            println!("Deleted {} bill(s) named {}", removed, name);
        }
        BillsCommand::SetAmount { bill, amount } => {
            let idx = resolve(&book, &bill)?;
            book.update_amount(idx, amount)?;
            println!("{}: amount ${:.2}", book.bills()[idx].name, amount);
        }
        BillsCommand::SetDay { bill, day } => {
            let idx = resolve(&book, &bill)?;
            book.update_due_day(idx, day)?;
            println!("{}: due on day {}", book.bills()[idx].name, day);
        }
        BillsCommand::Reset => {
            book.reset_to_defaults();
            println!("Reset to {} default bills", book.len());
        }
    }

    save_book(&book)
}

fn build_bill(
    name: String,
    amount: f64,
    category: String,
    due_day: u32,
    frequency: &str,
    month: Option<u32>,
) -> Result<Bill> {
    let frequency: Frequency = frequency.parse().map_err(anyhow::Error::msg)?;
    let bill = Bill::new(name, amount, category, due_day);
    Ok(match frequency {
        Frequency::Monthly => bill,
        Frequency::EveryTwoWeeks => bill.every_two_weeks(),
        Frequency::Annual => {
            let Some(month) = month else {
                bail!("annual bills need --month <1-12>");
            };
            bill.annual(month)
        }
    })
}

/// Accept "#3" / "3" as an index, otherwise look the name up.
fn resolve(book: &BillBook, key: &str) -> Result<usize> {
    let trimmed = key.trim().trim_start_matches('#');
    if let Ok(idx) = trimmed.parse::<usize>() {
        if idx < book.len() {
            return Ok(idx);
        }
    }
    book.position(key)
        .with_context(|| format!("no bill named or numbered '{key}'"))
}

fn print_bills(book: &BillBook) {
    if book.is_empty() {
        println!("No bills");
        return;
    }
    println!("{:>3}  {:<26} {:>10}  {:<14} {:>3}  {}", "#", "NAME", "AMOUNT", "CATEGORY", "DAY", "FREQUENCY");
    for (i, b) in book.bills().iter().enumerate() {
        let freq = match b.frequency {
            Frequency::Annual => format!("{} (month {})", b.frequency, b.annual_month),
            _ => b.frequency.to_string(),
        };
        println!(
            "{:>3}  {:<26} {:>10.2}  {:<14} {:>3}  {}",
            i, b.name, b.amount, b.category, b.due_day, freq
        );
    }
    let total: f64 = book.bills().iter().map(|b| b.amount).sum();
    println!("\n{} bills, ${:.2} total (version {})", book.len(), total, book.version());
}
