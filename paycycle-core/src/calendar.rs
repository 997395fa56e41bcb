//! Calendar helpers shared by the recurrence resolver, planner and simulator.

use chrono::{Datelike, Months, NaiveDate};

/// Number of days in `month` (1-12) of `year`. Returns 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        // Only reachable at the very end of chrono's supported range.
        None => 31,
    }
}

/// The date at `day` of the given month, with `day` clamped into the month.
///
/// Day 31 in February lands on the 28th (or 29th), never on March 3.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = days_in_month(year, month);
    if last == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last))
}

/// First day of the month containing `date`.
pub fn floor_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shift `date` by whole months, clamping the day like [`clamped_date`].
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// Every `(year, month)` whose first day lies in `[floor_month(start), floor_month(end)]`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> Vec<(i32, u32)> {
    let last = floor_month(end);
    let mut cursor = floor_month(start);
    let mut out = Vec::new();
    while cursor <= last {
        out.push((cursor.year(), cursor.month()));
        match cursor.checked_add_months(Months::new(1)) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    out
}

/// Half-open containment: `start <= date < end`.
pub fn in_window(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date < end
}
