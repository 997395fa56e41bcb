use thiserror::Error;

/// Reasons a bill-book command is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum BookError {
    #[error("no bill at index {0}")]
    IndexOutOfRange(usize),
    #[error("no bill named '{0}'")]
    UnknownBill(String),
    #[error("due day must be between 1 and 31, got {0}")]
    InvalidDueDay(u32),
    #[error("annual month must be between 0 and 12, got {0}")]
    InvalidAnnualMonth(u32),
    #[error("amount must be a non-negative number, got {0}")]
    InvalidAmount(f64),
    #[error("bill name must not be empty")]
    EmptyName,
}
