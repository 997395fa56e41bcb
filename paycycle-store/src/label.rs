//! Snapshot labels: `Budget_<Mon>_<Year>`, e.g. `Budget_Mar_2025`.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::cmp::Reverse;
use std::fmt;
use std::sync::LazyLock;

pub const LABEL_PREFIX: &str = "Budget_";

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Budget_(?P<mon>[A-Za-z]{3})_(?P<year>\d{4})(?:\.csv)?$")
        .expect("label pattern is valid")
});

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A month/year parsed from a snapshot label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotLabel {
    year: i32,
    month: u32,
}

impl SnapshotLabel {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Label for the month containing `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse `Budget_Mar_2025` (a trailing `.csv` is tolerated).
    pub fn parse(label: &str) -> Option<Self> {
        let caps = LABEL_RE.captures(label.trim())?;
        let month = month_from_abbrev(&caps["mon"])?;
        let year: i32 = caps["year"].parse().ok()?;
        Self::new(year, month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for SnapshotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mon = MONTHS[self.month as usize - 1];
        write!(f, "{LABEL_PREFIX}{mon}_{}", self.year)
    }
}

fn month_from_abbrev(s: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(s))
        .map(|i| i as u32 + 1)
}

/// Sort key for a label; unparseable labels get the earliest possible date.
pub fn label_sort_key(label: &str) -> NaiveDate {
    SnapshotLabel::parse(label)
        .map(|l| l.first_day())
        .unwrap_or(NaiveDate::MIN)
}

/// Most recent label by parsed month. Ties keep their listing order.
pub fn latest_label(labels: &[String]) -> Option<&str> {
    let mut sorted: Vec<&String> = labels.iter().collect();
    sorted.sort_by_key(|l| Reverse(label_sort_key(l)));
    sorted.first().map(|l| l.as_str())
}
