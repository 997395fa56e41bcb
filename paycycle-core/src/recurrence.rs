//! Recurrence resolver: which occurrences of a bill fall inside a pay window.
//!
//! Pure and deterministic. Windows are half-open `[start, end)`.

use chrono::{Datelike, NaiveDate};
use tracing::trace;

use crate::bill::{Bill, Frequency};
use crate::calendar::{clamped_date, in_window, months_between};

/// Sorted, de-duplicated due dates of `bill` with `start <= date < end`.
pub fn due_dates(bill: &Bill, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start >= end {
        return vec![];
    }

    let mut dates: Vec<NaiveDate> = match bill.frequency {
        Frequency::Monthly => months_between(start, end)
            .into_iter()
            .filter_map(|(y, m)| clamped_date(y, m, bill.due_day))
            .filter(|d| in_window(*d, start, end))
            .collect(),
        Frequency::Annual => annual_dates(bill, start, end),
        // No anchor is tracked, so the bill is due once per window, at its start.
        Frequency::EveryTwoWeeks => vec![start],
    };

    dates.sort();
    dates.dedup();
    trace!(bill = %bill.name, %start, %end, count = dates.len(), "resolved due dates");
    dates
}

/// True when `bill` has at least one due date in the window.
pub fn is_due_in(bill: &Bill, start: NaiveDate, end: NaiveDate) -> bool {
    !due_dates(bill, start, end).is_empty()
}

fn annual_dates(bill: &Bill, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if !(1..=12).contains(&bill.annual_month) {
        return vec![];
    }
    let mut years = vec![start.year(), end.year()];
    years.dedup();
    years
        .into_iter()
        .filter_map(|y| clamped_date(y, bill.annual_month, bill.due_day))
        .filter(|d| in_window(*d, start, end))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_monthly_inside_single_month() {
        for day in [1, 9, 15, 28] {
            let bill = Bill::new("Phone", 100.0, "PHONE", day);
            let got = due_dates(&bill, d(2025, 4, 1), d(2025, 4, 30));
            assert_eq!(got, vec![d(2025, 4, day)]);
        }
    }

    #[test]
    fn test_day_31_clamps_in_february() {
        let bill = Bill::new("Insurance", 100.0, "Insurance", 31);
        let got = due_dates(&bill, d(2025, 2, 1), d(2025, 3, 1));
        assert_eq!(got, vec![d(2025, 2, 28)]);

        let got = due_dates(&bill, d(2024, 2, 1), d(2024, 3, 1));
        assert_eq!(got, vec![d(2024, 2, 29)]);
    }

    #[test]
    fn test_day_31_in_thirty_day_month_does_not_roll_over() {
        let bill = Bill::new("Avant", 125.0, "LOANS", 31);
        let got = due_dates(&bill, d(2025, 4, 20), d(2025, 5, 4));
        assert_eq!(got, vec![d(2025, 4, 30)]);
    }

    #[test]
    fn test_window_across_year_end() {
        let start = d(2025, 12, 19);
        let end = d(2026, 1, 2);

        let on_20th = Bill::new("Lowes", 54.0, "Loans", 20);
        assert_eq!(due_dates(&on_20th, start, end), vec![d(2025, 12, 20)]);

        let on_1st = Bill::new("Mortgage", 1772.0, "HOUSING", 1);
        assert_eq!(due_dates(&on_1st, start, end), vec![d(2026, 1, 1)]);

        let on_10th = Bill::new("Gym", 30.0, "OTHER", 10);
        assert!(due_dates(&on_10th, start, end).is_empty());
    }

    #[test]
    fn test_one_day_window_boundaries() {
        let bill = Bill::new("Klarna", 108.0, "LOANS", 13);
        assert_eq!(due_dates(&bill, d(2025, 6, 13), d(2025, 6, 14)), vec![d(2025, 6, 13)]);
        assert!(due_dates(&bill, d(2025, 6, 12), d(2025, 6, 13)).is_empty());
        assert!(due_dates(&bill, d(2025, 6, 14), d(2025, 6, 15)).is_empty());
    }

    #[test]
    fn test_long_window_yields_each_month_once() {
        let bill = Bill::new("Rent", 1200.0, "HOUSING", 15);
        let got = due_dates(&bill, d(2025, 1, 1), d(2025, 4, 1));
        assert_eq!(got, vec![d(2025, 1, 15), d(2025, 2, 15), d(2025, 3, 15)]);
    }

    #[test]
    fn test_annual() {
        let bill = Bill::new("Registration", 80.0, "CAR", 10).annual(1);
        assert_eq!(
            due_dates(&bill, d(2025, 12, 28), d(2026, 1, 11)),
            vec![d(2026, 1, 10)]
        );
        assert!(due_dates(&bill, d(2026, 2, 1), d(2026, 2, 15)).is_empty());

        let feb = Bill::new("Renewal", 50.0, "OTHER", 31).annual(2);
        assert_eq!(due_dates(&feb, d(2025, 2, 20), d(2025, 3, 6)), vec![d(2025, 2, 28)]);
    }

    #[test]
    fn test_annual_without_month_never_due() {
        let mut bill = Bill::new("Mystery", 10.0, "OTHER", 5).annual(0);
        assert!(due_dates(&bill, d(2025, 1, 1), d(2025, 12, 31)).is_empty());
        bill.annual_month = 13;
        assert!(due_dates(&bill, d(2025, 1, 1), d(2025, 12, 31)).is_empty());
    }

    #[test]
    fn test_every_two_weeks_once_per_window() {
        let bill = Bill::new("Daycare", 300.0, "OTHER", 1).every_two_weeks();
        assert_eq!(due_dates(&bill, d(2025, 3, 7), d(2025, 3, 21)), vec![d(2025, 3, 7)]);
        assert_eq!(due_dates(&bill, d(2025, 3, 21), d(2025, 4, 4)), vec![d(2025, 3, 21)]);
    }

    #[test]
    fn test_empty_window() {
        let bill = Bill::new("Daycare", 300.0, "OTHER", 1).every_two_weeks();
        assert!(due_dates(&bill, d(2025, 3, 7), d(2025, 3, 7)).is_empty());
        let bill = Bill::new("Rent", 1200.0, "HOUSING", 7);
        assert!(due_dates(&bill, d(2025, 3, 8), d(2025, 3, 7)).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let bill = Bill::new("Electricity", 346.0, "HOUSING", 12);
        let a = due_dates(&bill, d(2025, 11, 28), d(2026, 2, 1));
        let b = due_dates(&bill, d(2025, 11, 28), d(2026, 2, 1));
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }
}
