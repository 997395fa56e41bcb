//! The working set of bills and the commands that mutate it.
//!
//! All mutation goes through the methods here; each successful command bumps
//! `version` so callers can tell whether their copy is stale.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bill::{Bill, Frequency};
use crate::error::BookError;
use crate::snowball::Debt;

/// Category whose bills can be imported into the snowball tool.
pub const LOANS_CATEGORY: &str = "LOANS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillBook {
    bills: Vec<Bill>,
    #[serde(default)]
    version: u64,
}

impl Default for BillBook {
    fn default() -> Self {
        Self::from_bills(default_bills())
    }
}

impl BillBook {
    pub fn from_bills(bills: Vec<Bill>) -> Self {
        Self { bills, version: 0 }
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bill> {
        self.bills.get(index)
    }

    /// Append a bill (quick-add).
    pub fn add(&mut self, bill: Bill) -> Result<(), BookError> {
        if bill.name.trim().is_empty() {
            return Err(BookError::EmptyName);
        }
        check_amount(bill.amount)?;
        check_due_day(bill.due_day)?;
        if bill.annual_month > 12 {
            return Err(BookError::InvalidAnnualMonth(bill.annual_month));
        }
        info!(bill = %bill.name, amount = bill.amount, frequency = %bill.frequency, "bill added");
        self.bills.push(bill);
        self.bump();
        Ok(())
    }

    /// Remove every bill called `name`; returns how many were removed.
    pub fn delete(&mut self, name: &str) -> Result<usize, BookError> {
        let before = self.bills.len();
        self.bills.retain(|b| b.name != name);
        let removed = before - self.bills.len();
        if removed == 0 {
            return Err(BookError::UnknownBill(name.to_string()));
        }
        info!(bill = name, removed, "bill deleted");
        self.bump();
        Ok(removed)
    }

    pub fn update_amount(&mut self, index: usize, amount: f64) -> Result<(), BookError> {
        check_amount(amount)?;
        let bill = self
            .bills
            .get_mut(index)
            .ok_or(BookError::IndexOutOfRange(index))?;
        info!(bill = %bill.name, from = bill.amount, to = amount, "amount updated");
        bill.amount = amount;
        self.bump();
        Ok(())
    }

    pub fn update_due_day(&mut self, index: usize, due_day: u32) -> Result<(), BookError> {
        check_due_day(due_day)?;
        let bill = self
            .bills
            .get_mut(index)
            .ok_or(BookError::IndexOutOfRange(index))?;
        info!(bill = %bill.name, from = bill.due_day, to = due_day, "due day updated");
        bill.due_day = due_day;
        self.bump();
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        self.bills = default_bills();
        info!(count = self.bills.len(), "bills reset to defaults");
        self.bump();
    }

    /// Index of the first bill called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.bills.iter().position(|b| b.name == name)
    }

    /// Map LOANS bills to snowball debts, skipping names already in `existing`.
    ///
    /// Balance and APR start at zero and need user input before simulating.
    pub fn loan_debts(&self, existing: &[Debt]) -> Vec<Debt> {
        let mut out: Vec<Debt> = Vec::new();
        for bill in self.bills.iter().filter(|b| b.in_category(LOANS_CATEGORY)) {
            let taken = existing
                .iter()
                .chain(out.iter())
                .any(|d| d.name == bill.name);
            if !taken {
                out.push(Debt::new(bill.name.clone(), 0.0, 0.0, bill.amount));
            }
        }
        out
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

fn check_amount(amount: f64) -> Result<(), BookError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(BookError::InvalidAmount(amount))
    }
}

fn check_due_day(due_day: u32) -> Result<(), BookError> {
    if (1..=31).contains(&due_day) {
        Ok(())
    } else {
        Err(BookError::InvalidDueDay(due_day))
    }
}

/// Starting household bill set.
pub fn default_bills() -> Vec<Bill> {
    let monthly = |name: &str, amount: f64, category: &str, due_day: u32| Bill {
        name: name.to_string(),
        amount,
        category: category.to_string(),
        due_day,
        frequency: Frequency::Monthly,
        annual_month: 0,
    };

    vec![
        monthly("Mortgage", 1772.0, "HOUSING", 1),
        monthly("Rent", 1200.0, "HOUSING", 15),
        monthly("Electricity", 346.0, "HOUSING", 12),
        monthly("Lowes", 54.0, "Loans", 20),
        monthly("AT&T Phone", 100.0, "PHONE", 26),
        monthly("AT&T Internet - Home", 100.0, "Internet", 26),
        monthly("AT&T Internet - Nick", 100.0, "Internet", 26),
        monthly("AT&T Internet", 36.0, "ENTERTAINMENT", 14),
        monthly("Klarna", 108.0, "LOANS", 13),
        monthly("Avant", 125.0, "LOANS", 28),
        monthly("Car Insurance - Me", 100.0, "Insurance", 26),
        monthly("Car Insurance - Mom", 100.0, "Insurance", 26),
        monthly("Car Insurance - Ny", 100.0, "Insurance", 26),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_book() {
        let book = BillBook::default();
        assert_eq!(book.len(), 13);
        assert_eq!(book.version(), 0);
        assert_eq!(book.bills()[0].name, "Mortgage");
    }

    #[test]
    fn test_add_and_delete_bump_version() {
        let mut book = BillBook::from_bills(vec![]);
        book.add(Bill::new("Gym", 30.0, "OTHER", 5)).unwrap();
        book.add(Bill::new("Gym", 30.0, "OTHER", 20)).unwrap();
        assert_eq!(book.version(), 2);

        assert_eq!(book.delete("Gym"), Ok(2));
        assert!(book.is_empty());
        assert_eq!(book.version(), 3);

        assert_eq!(book.delete("Gym"), Err(BookError::UnknownBill("Gym".into())));
        assert_eq!(book.version(), 3);
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let mut book = BillBook::from_bills(vec![]);
        assert_eq!(
            book.add(Bill::new("Bad", 10.0, "OTHER", 0)),
            Err(BookError::InvalidDueDay(0))
        );
        assert_eq!(
            book.add(Bill::new("Bad", -1.0, "OTHER", 3)),
            Err(BookError::InvalidAmount(-1.0))
        );
        assert_eq!(
            book.add(Bill::new("  ", 1.0, "OTHER", 3)),
            Err(BookError::EmptyName)
        );
        assert_eq!(
            book.add(Bill::new("Bad", 1.0, "OTHER", 3).annual(13)),
            Err(BookError::InvalidAnnualMonth(13))
        );
        assert_eq!(book.version(), 0);
    }

    #[test]
    fn test_updates() {
        let mut book = BillBook::default();
        book.update_amount(2, 410.5).unwrap();
        book.update_due_day(2, 31).unwrap();
        let bill = book.get(2).unwrap();
        assert_eq!(bill.amount, 410.5);
        assert_eq!(bill.due_day, 31);

        assert_eq!(book.update_due_day(2, 32), Err(BookError::InvalidDueDay(32)));
        assert_eq!(
            book.update_amount(99, 1.0),
            Err(BookError::IndexOutOfRange(99))
        );
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut book = BillBook::from_bills(vec![Bill::new("Gym", 30.0, "OTHER", 5)]);
        book.reset_to_defaults();
        assert_eq!(book.bills(), default_bills().as_slice());
        assert_eq!(book.version(), 1);
    }

    #[test]
    fn test_loan_debts_import() {
        let book = BillBook::default();
        let existing = vec![Debt::new("Klarna", 640.0, 0.0, 108.0)];
        let imported = book.loan_debts(&existing);

        let names: Vec<&str> = imported.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Lowes", "Avant"]);
        assert_eq!(imported[0].min_payment, 54.0);
        assert_eq!(imported[0].balance, 0.0);
        assert_eq!(imported[1].apr, 0.0);
    }
}
