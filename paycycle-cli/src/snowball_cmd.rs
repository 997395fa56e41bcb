use anyhow::{Result, anyhow, bail};
use paycycle_core::time::today_in;
use paycycle_core::{BillBook, Debt, SnowballResult, active_debts, simulate};
use tracing::debug;

use crate::config::Config;
use crate::state::load_book;

/// One `--debt` argument. `min_payment` may be left out for imported loans.
#[derive(Debug, Clone, PartialEq)]
pub struct DebtArg {
    pub name: String,
    pub balance: f64,
    pub apr: f64,
    pub min_payment: Option<f64>,
}

fn number(s: &str) -> Option<f64> {
    s.trim().trim_start_matches('$').replace(',', "").parse().ok()
}

/// Parse NAME:BALANCE:APR[:MIN]. The name may itself contain ':'.
pub fn parse_debt(arg: &str) -> Result<DebtArg> {
    let usage = || anyhow!("expected NAME:BALANCE:APR[:MIN], got '{arg}'");

    let mut parts: Vec<&str> = arg.rsplitn(4, ':').collect();
    parts.reverse();
    if let [name, balance, apr, min] = parts[..] {
        if let (Some(balance), Some(apr), Some(min)) = (number(balance), number(apr), number(min)) {
            return debt_arg(name, balance, apr, Some(min)).ok_or_else(usage);
        }
    }

    let mut parts: Vec<&str> = arg.rsplitn(3, ':').collect();
    parts.reverse();
    if let [name, balance, apr] = parts[..] {
        if let (Some(balance), Some(apr)) = (number(balance), number(apr)) {
            return debt_arg(name, balance, apr, None).ok_or_else(usage);
        }
    }

    Err(usage())
}

fn debt_arg(name: &str, balance: f64, apr: f64, min_payment: Option<f64>) -> Option<DebtArg> {
    let name = name.trim();
    (!name.is_empty()).then(|| DebtArg {
        name: name.to_string(),
        balance,
        apr,
        min_payment,
    })
}

/// Debts to simulate.
///
/// With no arguments the list starts from the default card. Imported loans
/// are appended, then each argument either fills in the balance and APR of
/// the debt with the same name or adds a new debt (MIN required).
pub fn build_debts(args: Vec<DebtArg>, loans_from: Option<&BillBook>) -> Result<Vec<Debt>> {
    let mut debts = Vec::new();
    if args.is_empty() {
        debts.push(Debt::new("Credit Card 1", 500.0, 20.0, 25.0));
    }
    if let Some(book) = loans_from {
        let imported = book.loan_debts(&debts);
        debts.extend(imported);
    }

    for arg in args {
        match debts.iter_mut().find(|d| d.name.eq_ignore_ascii_case(&arg.name)) {
            Some(debt) => {
                debt.balance = arg.balance;
                debt.apr = arg.apr;
                if let Some(min) = arg.min_payment {
                    debt.min_payment = min;
                }
            }
            None => {
                let Some(min) = arg.min_payment else {
                    bail!("{}: no imported loan by that name, so MIN is required", arg.name);
                };
                debts.push(Debt::new(arg.name, arg.balance, arg.apr, min));
            }
        }
    }
    Ok(debts)
}

pub fn run(
    cfg: &Config,
    args: &[String],
    import_loans: bool,
    extra: Option<f64>,
    full: bool,
) -> Result<()> {
    let parsed = args.iter().map(|s| parse_debt(s)).collect::<Result<Vec<_>>>()?;
    let book = if import_loans { Some(load_book()?) } else { None };
    let debts = build_debts(parsed, book.as_ref())?;

    for d in debts.iter().filter(|d| d.balance <= 0.0) {
        println!(
            "Skipping {} (min ${:.2}): no balance; pass --debt \"{}:BALANCE:APR\"",
            d.name, d.min_payment, d.name
        );
    }

    let active = active_debts(&debts);
    if active.is_empty() {
        bail!("Enter at least one debt with a balance > 0.");
    }

    let extra = extra.unwrap_or(cfg.budget.extra_payment);
    let start = today_in(&cfg.budget.timezone)?;
    debug!(debts = active.len(), extra, %start, "running snowball");
    let result = simulate(&active, extra, start);
    print_snowball(&result, full);
    Ok(())
}

fn print_snowball(result: &SnowballResult, full: bool) {
    println!("# Debt snowball\n");
    if result.hit_cap {
        println!(
            "Not paid off within {} months; ${:.2} still owed. Raise the extra payment.",
            result.months(),
            result.final_balance()
        );
    } else {
        println!("Debt free date:  {}", result.payoff_date.format("%B %Y"));
    }
    println!("Total debt:      ${:.0}", result.starting_total);
    println!("Time to freedom: {} months\n", result.months());

    let step = if full { 1 } else { (result.months() / 12).max(1) };
    for (i, entry) in result.schedule.iter().enumerate() {
        if i % step == 0 || i + 1 == result.months() {
            println!("{:<9} ${:>12.2}", entry.month, entry.remaining);
        }
    }
}
