//! paycycle-core: bill recurrence, pay-period planning and debt snowball simulation

pub mod bill;
pub mod book;
pub mod calendar;
pub mod error;
pub mod planner;
pub mod recurrence;
pub mod snowball;
pub mod time;

pub use bill::{Bill, Frequency};
pub use book::{BillBook, LOANS_CATEGORY, default_bills};
pub use error::BookError;
pub use planner::{
    CyclePlan, PAY_PERIOD_DAYS, PayWindow, PeriodIncome, PeriodPlan, bills_in_window,
    default_incomes, plan_cycle,
};
pub use recurrence::{due_dates, is_due_in};
pub use snowball::{Debt, MAX_MONTHS, ScheduleEntry, SnowballResult, active_debts, simulate};
