//! Bill records and their recurrence rule.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A recurring obligation in the budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    /// Display name; expected unique within a budget but not enforced
    pub name: String,
    /// Non-negative amount due per occurrence
    pub amount: f64,
    /// Free-text tag, compared case-insensitively (e.g. "LOANS")
    pub category: String,
    /// Day-of-month anchor (1-31), clamped into short months
    pub due_day: u32,
    /// Recurrence rule
    #[serde(default)]
    pub frequency: Frequency,
    /// Month (1-12) for annual bills; 0 means unset
    #[serde(default)]
    pub annual_month: u32,
}

/// How often a bill comes due.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Frequency {
    #[default]
    #[serde(rename = "Monthly")]
    Monthly,
    /// Due once in every pay window (no anchor date is tracked)
    #[serde(rename = "Every 2 Weeks")]
    EveryTwoWeeks,
    #[serde(rename = "Annual")]
    Annual,
}

impl Frequency {
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Monthly => "Monthly",
            Frequency::EveryTwoWeeks => "Every 2 Weeks",
            Frequency::Annual => "Annual",
        }
    }

    /// Lenient parse used for imported data: anything unrecognized is Monthly.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match norm.as_str() {
            "monthly" => Ok(Frequency::Monthly),
            "every2weeks" | "everytwoweeks" | "biweekly" => Ok(Frequency::EveryTwoWeeks),
            "annual" | "yearly" => Ok(Frequency::Annual),
            _ => Err(format!("unknown frequency: {s}")),
        }
    }
}

impl Bill {
    /// Create a monthly bill
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        due_day: u32,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            category: category.into(),
            due_day,
            frequency: Frequency::Monthly,
            annual_month: 0,
        }
    }

    pub fn every_two_weeks(mut self) -> Self {
        self.frequency = Frequency::EveryTwoWeeks;
        self.annual_month = 0;
        self
    }

    pub fn annual(mut self, month: u32) -> Self {
        self.frequency = Frequency::Annual;
        self.annual_month = month;
        self
    }

    /// Case-insensitive category match
    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }
}
