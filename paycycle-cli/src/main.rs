use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use paycycle_core::time::{parse_date, today_in};
use paycycle_core::{
    Bill, BillBook, CyclePlan, PayWindow, default_incomes, due_dates, plan_cycle,
};
use paycycle_store::{Snapshot, SnapshotLabel, SnapshotMeta, SnapshotStore};

mod bills_cmd;
mod config;
mod history_cmd;
mod logging;
mod setup;
mod snowball_cmd;
mod state;

use config::{Config, load_config};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PAYCYCLE_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "paycycle", version = VERSION, about = "Pay-period bill planner and debt snowball")]
struct Cli {
    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive setup: timezone, default income, snapshot directory
    Setup,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Manage the working bill set
    Bills {
        #[command(subcommand)]
        command: bills_cmd::BillsCommand,
    },

    /// Lay the bills out over the pay windows of one cycle
    Plan {
        /// First pay date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        pay_date: Option<String>,

        /// Force the three-paycheck view
        #[arg(long, default_value_t = false)]
        three: bool,
    },

    /// Simulate a debt snowball (smallest balance first)
    Snowball {
        /// NAME:BALANCE:APR[:MIN], repeatable; MIN defaults to an imported loan's bill amount
        #[arg(long = "debt")]
        debts: Vec<String>,

        /// Add LOANS bills from the budget as debts; give each a balance with --debt
        #[arg(long, default_value_t = false)]
        import_loans: bool,

        /// Extra monthly payment (default from config)
        #[arg(long)]
        extra: Option<f64>,

        /// Print every month of the schedule
        #[arg(long, default_value_t = false)]
        full: bool,
    },

    /// Save & close the month: snapshot the bills and cycle metadata
    Close {
        /// Snapshot label (default: Budget_<Mon>_<Year> for today)
        #[arg(long)]
        label: Option<String>,

        /// First pay date recorded with the snapshot (default: today)
        #[arg(long)]
        pay_date: Option<String>,
    },

    /// Browse saved months
    History {
        #[command(subcommand)]
        command: history_cmd::HistoryCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        Command::Setup => {
            setup::run_setup()?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Show => {
                let cfg = load_config()?;
                println!("# {}\n", config::config_path()?.display());
                println!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                println!("# snapshots: {}", state::snapshot_store(&cfg)?.dir().display());
            }
        },

        Command::Bills { command } => bills_cmd::run(command)?,

        Command::Plan { pay_date, three } => {
            let cfg = load_config()?;
            let first_pay = resolve_date(pay_date.as_deref(), &cfg)?;
            plan(&cfg, first_pay, three)?;
        }

        Command::Snowball {
            debts,
            import_loans,
            extra,
            full,
        } => {
            let cfg = load_config()?;
            snowball_cmd::run(&cfg, &debts, import_loans, extra, full)?;
        }

        Command::Close { label, pay_date } => {
            let cfg = load_config()?;
            close_month(&cfg, label, pay_date.as_deref())?;
        }

        Command::History { command } => history_cmd::run(command)?,
    }

    Ok(())
}

fn resolve_date(arg: Option<&str>, cfg: &Config) -> Result<NaiveDate> {
    match arg {
        Some(s) => parse_date(s),
        None => today_in(&cfg.budget.timezone),
    }
}

fn build_plan(cfg: &Config, book: &BillBook, first_pay: NaiveDate, force_three: bool) -> CyclePlan {
    let windows = PayWindow::cycle(first_pay, force_three);
    let incomes = default_incomes(
        windows.len(),
        cfg.income.pay,
        cfg.income.rent,
        cfg.income.other,
    );
    plan_cycle(book.bills(), &windows, &incomes)
}

fn plan(cfg: &Config, first_pay: NaiveDate, force_three: bool) -> Result<()> {
    let book = state::load_book()?;
    let cycle = build_plan(cfg, &book, first_pay, force_three);
    print_plan(book.bills(), &cycle);
    Ok(())
}

fn print_plan(bills: &[Bill], cycle: &CyclePlan) {
    println!("# Current budget\n");

    for (i, period) in cycle.periods.iter().enumerate() {
        println!("## Pay #{} ({})", i + 1, period.window.label());
        println!(
            "Income: ${:.0} (pay {:.0} + rent {:.0} + other {:.0})",
            period.income.total(),
            period.income.pay,
            period.income.rent,
            period.income.other
        );

        if period.bills.is_empty() {
            println!("No bills");
        }
        for &idx in &period.bills {
            let b = &bills[idx];
            let due: Vec<String> = due_dates(b, period.window.start, period.window.end)
                .iter()
                .map(|d| d.format("%b %d").to_string())
                .collect();
            println!("- {:<26} ${:>9.2}  due {}", b.name, b.amount, due.join(", "));
        }

        println!("Bills: ${:.2}", period.bill_total);
        if period.is_short() {
            println!("Short: ${:.2}\n", period.leftover());
        } else {
            println!("Left: ${:.2}\n", period.leftover());
        }
    }

    if !cycle.orphans.is_empty() {
        println!("## Not due in any window this cycle");
        for &idx in &cycle.orphans {
            let b = &bills[idx];
            println!("- {} ({}, day {})", b.name, b.frequency, b.due_day);
        }
    }
}

/// Snapshot the working set under `label` (default: the month of `today`).
/// Returns the label written and what was saved.
fn close_into(
    store: &impl SnapshotStore,
    cfg: &Config,
    book: &BillBook,
    label: Option<String>,
    pay_date: Option<&str>,
    today: NaiveDate,
) -> Result<(String, Snapshot)> {
    let label = label.unwrap_or_else(|| SnapshotLabel::for_date(today).to_string());
    let pay_date = match pay_date {
        Some(s) => parse_date(s)?,
        None => today,
    };

    let incomes = default_incomes(2, cfg.income.pay, cfg.income.rent, cfg.income.other);
    let snapshot = Snapshot::new(
        book.bills().to_vec(),
        Some(SnapshotMeta::new(pay_date, &incomes)),
    );
    store
        .save(&label, &snapshot)
        .with_context(|| format!("saving {label} (labels look like Budget_Mar_2025)"))?;
    Ok((label, snapshot))
}

fn close_month(cfg: &Config, label: Option<String>, pay_date: Option<&str>) -> Result<()> {
    let today = today_in(&cfg.budget.timezone)?;
    let book = state::load_book()?;
    let store = state::snapshot_store(cfg)?;
    let (label, snapshot) = close_into(&store, cfg, &book, label, pay_date, today)?;
    println!(
        "Saved {} ({} bills) to {}",
        label,
        snapshot.bills.len(),
        store.path_for(&label).display()
    );
    Ok(())
}
