//! Period planner: splits a pay cycle into windows and assigns bills to them.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bill::Bill;
use crate::recurrence::is_due_in;

/// Days between consecutive paychecks.
pub const PAY_PERIOD_DAYS: i64 = 14;

/// Half-open `[start, end)` coverage of one paycheck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PayWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Build the ordered windows of one budget cycle.
    ///
    /// Paydays fall every 14 days from `first_pay`. A third window is added when
    /// the first and third paydays share a calendar month, or when forced.
    pub fn cycle(first_pay: NaiveDate, force_three: bool) -> Vec<PayWindow> {
        let period = Duration::days(PAY_PERIOD_DAYS);
        let third = first_pay + period * 2;
        let count = if force_three || first_pay.month() == third.month() {
            3
        } else {
            2
        };

        (0..count)
            .map(|i| {
                let start = first_pay + period * i;
                PayWindow::new(start, start + period)
            })
            .collect()
    }

    /// Inclusive last day covered.
    pub fn last_day(&self) -> NaiveDate {
        self.end - Duration::days(1)
    }

    /// Human label like "Mar 07 - Mar 20".
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%b %d"),
            self.last_day().format("%b %d")
        )
    }
}

/// Income expected for one pay window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodIncome {
    pub pay: f64,
    pub rent: f64,
    pub other: f64,
}

impl PeriodIncome {
    pub fn new(pay: f64, rent: f64, other: f64) -> Self {
        Self { pay, rent, other }
    }

    pub fn total(&self) -> f64 {
        self.pay + self.rent + self.other
    }
}

/// One window's share of the budget.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodPlan {
    pub window: PayWindow,
    /// Indices into the bill list; each bill appears at most once
    pub bills: Vec<usize>,
    pub bill_total: f64,
    pub income: PeriodIncome,
}

impl PeriodPlan {
    pub fn leftover(&self) -> f64 {
        self.income.total() - self.bill_total
    }

    /// True when bills consume all of the income
    pub fn is_short(&self) -> bool {
        self.leftover() <= 0.0
    }
}

/// Bills laid out over a whole cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CyclePlan {
    pub periods: Vec<PeriodPlan>,
    /// Bills not due in any window of this cycle
    pub orphans: Vec<usize>,
}

impl CyclePlan {
    pub fn bill_total(&self) -> f64 {
        self.periods.iter().map(|p| p.bill_total).sum()
    }

    pub fn income_total(&self) -> f64 {
        self.periods.iter().map(|p| p.income.total()).sum()
    }
}

/// Indices of bills due at least once inside `window`.
pub fn bills_in_window(bills: &[Bill], window: &PayWindow) -> Vec<usize> {
    bills
        .iter()
        .enumerate()
        .filter(|(_, b)| is_due_in(b, window.start, window.end))
        .map(|(i, _)| i)
        .collect()
}

/// Assign bills to every window and collect the orphans.
///
/// `incomes[i]` pairs with `windows[i]`; missing entries count as zero income.
pub fn plan_cycle(bills: &[Bill], windows: &[PayWindow], incomes: &[PeriodIncome]) -> CyclePlan {
    let mut seen = vec![false; bills.len()];

    let periods: Vec<PeriodPlan> = windows
        .iter()
        .enumerate()
        .map(|(i, window)| {
            let included = bills_in_window(bills, window);
            for &idx in &included {
                seen[idx] = true;
            }
            let bill_total = included.iter().map(|&idx| bills[idx].amount).sum();
            debug!(
                window = %window.label(),
                bills = included.len(),
                bill_total,
                "planned pay window"
            );
            PeriodPlan {
                window: *window,
                bills: included,
                bill_total,
                income: incomes.get(i).copied().unwrap_or_default(),
            }
        })
        .collect();

    let orphans: Vec<usize> = seen
        .iter()
        .enumerate()
        .filter(|(_, hit)| !**hit)
        .map(|(i, _)| i)
        .collect();

    for &idx in &orphans {
        warn!(bill = %bills[idx].name, "bill is not due in any pay window this cycle");
    }

    CyclePlan { periods, orphans }
}

/// Default incomes for `count` windows: `pay` every window, `rent` only in the first.
pub fn default_incomes(count: usize, pay: f64, rent: f64, other: f64) -> Vec<PeriodIncome> {
    (0..count)
        .map(|i| PeriodIncome::new(pay, if i == 0 { rent } else { 0.0 }, other))
        .collect()
}
