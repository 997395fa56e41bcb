//! Debt snowball simulator.
//!
//! Debts are ordered once, smallest balance first, and every month all
//! discretionary money goes to the first debt in that order that still has a
//! balance. A cleared debt's minimum payment joins the discretionary pool.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::add_months;

/// Upper bound on simulated months (30 years).
pub const MAX_MONTHS: usize = 360;

/// One debt entering a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub name: String,
    pub balance: f64,
    /// Annual percentage rate, e.g. 20.0 for 20%
    pub apr: f64,
    pub min_payment: f64,
}

impl Debt {
    pub fn new(name: impl Into<String>, balance: f64, apr: f64, min_payment: f64) -> Self {
        Self {
            name: name.into(),
            balance,
            apr,
            min_payment,
        }
    }

    fn monthly_interest(&self) -> f64 {
        self.balance * (self.apr / 100.0) / 12.0
    }
}

/// Total debt left after one simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// e.g. "Apr 2025"
    pub month: String,
    pub remaining: f64,
}

/// Outcome of a snowball run.
#[derive(Debug, Clone, PartialEq)]
pub struct SnowballResult {
    pub schedule: Vec<ScheduleEntry>,
    /// Calendar cursor after the last simulated month
    pub payoff_date: NaiveDate,
    pub starting_total: f64,
    /// The month cap stopped the run with debt still outstanding
    pub hit_cap: bool,
}

impl SnowballResult {
    pub fn months(&self) -> usize {
        self.schedule.len()
    }

    pub fn final_balance(&self) -> f64 {
        self.schedule.last().map(|e| e.remaining).unwrap_or(self.starting_total)
    }
}

/// Drop debts that have nothing left to pay.
pub fn active_debts(debts: &[Debt]) -> Vec<Debt> {
    debts.iter().filter(|d| d.balance > 0.0).cloned().collect()
}

/// Simulate month-by-month payoff starting after `start`.
///
/// The calendar cursor advances one month before each simulated month, so the
/// first entry is labelled with the month after `start`.
pub fn simulate(debts: &[Debt], extra_payment: f64, start: NaiveDate) -> SnowballResult {
    let mut debts = debts.to_vec();
    // Stable sort: ties keep input order. The order is never recomputed.
    debts.sort_by(|a, b| a.balance.total_cmp(&b.balance));

    let starting_total: f64 = debts.iter().map(|d| d.balance).sum();
    let mut schedule = Vec::new();
    let mut cursor = start;
    let mut freed_minimums = 0.0;

    while debts.iter().any(|d| d.balance > 0.0) && schedule.len() < MAX_MONTHS {
        cursor = add_months(start, schedule.len() as u32 + 1);
        let mut pool = extra_payment + freed_minimums;

        for debt in debts.iter_mut().filter(|d| d.balance > 0.0) {
            debt.balance += debt.monthly_interest();
            let payment = debt.balance.min(debt.min_payment);
            debt.balance -= payment;
            if debt.balance <= 0.0 {
                debt.balance = 0.0;
                freed_minimums += debt.min_payment;
                pool += debt.min_payment;
                debug!(debt = %debt.name, month = %cursor.format("%b %Y"), "cleared by minimum payment");
            }
        }

        for debt in debts.iter_mut().filter(|d| d.balance > 0.0) {
            if pool <= 0.0 {
                break;
            }
            let attack = debt.balance.min(pool);
            debt.balance -= attack;
            pool -= attack;
            if debt.balance <= 0.0 {
                debt.balance = 0.0;
                freed_minimums += debt.min_payment;
                debug!(debt = %debt.name, month = %cursor.format("%b %Y"), "cleared by snowball");
            }
        }

        let remaining = debts.iter().map(|d| d.balance).sum();
        schedule.push(ScheduleEntry {
            month: cursor.format("%b %Y").to_string(),
            remaining,
        });
    }

    let hit_cap = debts.iter().any(|d| d.balance > 0.0);
    if hit_cap {
        warn!(
            months = schedule.len(),
            remaining = schedule.last().map(|e| e.remaining).unwrap_or(starting_total),
            "snowball did not converge within the month cap"
        );
    }

    SnowballResult {
        schedule,
        payoff_date: cursor,
        starting_total,
        hit_cap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    #[test]
    fn test_single_card_pays_off_in_five_months() {
        let debts = vec![Debt::new("Credit Card 1", 500.0, 20.0, 25.0)];
        let result = simulate(&debts, 100.0, start());

        assert_eq!(result.months(), 5);
        assert_eq!(result.final_balance(), 0.0);
        assert!(!result.hit_cap);

        // Month 1: 500 + 8.33 interest - 25 minimum - 100 extra
        let first = result.schedule[0].remaining;
        assert!((first - (500.0 + 500.0 * 0.2 / 12.0 - 125.0)).abs() < 1e-9);
        assert_eq!(result.schedule[0].month, "Apr 2025");
        assert_eq!(result.payoff_date, NaiveDate::from_ymd_opt(2025, 8, 15).unwrap());
    }

    #[test]
    fn test_smallest_balance_cleared_first_and_rolls_over() {
        let debts = vec![
            Debt::new("Big", 900.0, 0.0, 10.0),
            Debt::new("Small", 100.0, 0.0, 10.0),
        ];
        let result = simulate(&debts, 0.0, start());
        let remaining: Vec<f64> = result.schedule.iter().map(|e| e.remaining).collect();

        // Both minimums only, until Small clears in month 10.
        assert_eq!(remaining[8], 820.0);
        // Month 10: Small's final 10 plus its freed minimum snowballs into Big.
        assert_eq!(remaining[9], 790.0);
        // From month 11 Big receives 20 a month.
        assert_eq!(remaining[10], 770.0);
        assert_eq!(result.final_balance(), 0.0);
        assert_eq!(result.months(), 50);
    }

    #[test]
    fn test_order_fixed_by_starting_balance() {
        let debts = vec![
            Debt::new("A", 300.0, 0.0, 0.0),
            Debt::new("B", 200.0, 0.0, 0.0),
        ];
        let result = simulate(&debts, 150.0, start());
        assert_eq!(result.schedule[0].remaining, 350.0);
        assert_eq!(result.schedule[1].remaining, 200.0);
        assert_eq!(result.months(), 4);
    }

    #[test]
    fn test_remaining_is_non_increasing() {
        let debts = vec![
            Debt::new("Klarna", 640.0, 0.0, 108.0),
            Debt::new("Avant", 2400.0, 29.9, 125.0),
            Debt::new("Card", 3100.0, 22.5, 90.0),
        ];
        let result = simulate(&debts, 150.0, start());
        for w in result.schedule.windows(2) {
            assert!(w[1].remaining <= w[0].remaining, "{:?}", w);
        }
        assert_eq!(result.final_balance(), 0.0);
    }

    #[test]
    fn test_cap_when_interest_outpaces_payments() {
        let debts = vec![Debt::new("Loan", 10_000.0, 30.0, 50.0)];
        let result = simulate(&debts, 0.0, start());
        assert_eq!(result.months(), MAX_MONTHS);
        assert!(result.hit_cap);
        assert!(result.final_balance() > 0.0);
    }

    #[test]
    fn test_active_debts_filters_zero_balances() {
        let debts = vec![
            Debt::new("Lowes", 0.0, 0.0, 54.0),
            Debt::new("Card", 10.0, 0.0, 5.0),
        ];
        let active = active_debts(&debts);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Card");
    }
}
