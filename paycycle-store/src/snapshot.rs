//! CSV snapshot of a month's bills plus the pay-cycle metadata.
//!
//! Layout (metadata repeated on every row):
//! name,amount,category,due_day,frequency,annual_month,meta_pay_date,
//! meta_inc_pay_0,meta_inc_rent_0,meta_inc_other_0,
//! meta_inc_pay_1,meta_inc_rent_1,meta_inc_other_1

use chrono::NaiveDate;
use paycycle_core::time::parse_date;
use paycycle_core::{Bill, Frequency, PeriodIncome};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::debug;

/// Number of pay periods whose income is recorded.
pub const META_PERIODS: usize = 2;

const HEADER: [&str; 13] = [
    "name",
    "amount",
    "category",
    "due_day",
    "frequency",
    "annual_month",
    "meta_pay_date",
    "meta_inc_pay_0",
    "meta_inc_rent_0",
    "meta_inc_other_0",
    "meta_inc_pay_1",
    "meta_inc_rent_1",
    "meta_inc_other_1",
];

/// Bills and metadata stored under one label.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub bills: Vec<Bill>,
    pub meta: Option<SnapshotMeta>,
}

/// First pay date and per-period income of the saved cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotMeta {
    pub pay_date: NaiveDate,
    pub incomes: [PeriodIncome; META_PERIODS],
}

impl Snapshot {
    pub fn new(bills: Vec<Bill>, meta: Option<SnapshotMeta>) -> Self {
        Self { bills, meta }
    }
}

impl SnapshotMeta {
    /// Take the first two incomes; missing periods count as zero.
    pub fn new(pay_date: NaiveDate, incomes: &[PeriodIncome]) -> Self {
        let mut out = [PeriodIncome::default(); META_PERIODS];
        for (slot, income) in out.iter_mut().zip(incomes) {
            *slot = *income;
        }
        Self {
            pay_date,
            incomes: out,
        }
    }
}

#[derive(Debug, Serialize)]
struct RowOut<'a> {
    name: &'a str,
    amount: f64,
    category: &'a str,
    due_day: u32,
    frequency: &'static str,
    annual_month: u32,
    meta_pay_date: Option<String>,
    meta_inc_pay_0: Option<f64>,
    meta_inc_rent_0: Option<f64>,
    meta_inc_other_0: Option<f64>,
    meta_inc_pay_1: Option<f64>,
    meta_inc_rent_1: Option<f64>,
    meta_inc_other_1: Option<f64>,
}

/// Tolerant row shape: any column may be absent or blank.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RowIn {
    name: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    amount: Option<f64>,
    category: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    due_day: Option<f64>,
    frequency: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    annual_month: Option<f64>,
    meta_pay_date: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    meta_inc_pay_0: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    meta_inc_rent_0: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    meta_inc_other_0: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    meta_inc_pay_1: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    meta_inc_rent_1: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    meta_inc_other_1: Option<f64>,
}

impl RowIn {
    fn to_bill(&self) -> Option<Bill> {
        let name = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
        Some(Bill {
            name: name.to_string(),
            amount: self.amount.unwrap_or(0.0),
            category: self.category.clone().unwrap_or_default(),
            due_day: self.due_day.map(whole).unwrap_or(1).clamp(1, 31),
            frequency: self
                .frequency
                .as_deref()
                .map(Frequency::parse_or_default)
                .unwrap_or_default(),
            annual_month: self.annual_month.map(whole).unwrap_or(0),
        })
    }

    fn to_meta(&self) -> Option<SnapshotMeta> {
        let pay_date = parse_date(self.meta_pay_date.as_deref()?).ok()?;
        let zero = |v: Option<f64>| v.unwrap_or(0.0);
        Some(SnapshotMeta {
            pay_date,
            incomes: [
                PeriodIncome::new(
                    zero(self.meta_inc_pay_0),
                    zero(self.meta_inc_rent_0),
                    zero(self.meta_inc_other_0),
                ),
                PeriodIncome::new(
                    zero(self.meta_inc_pay_1),
                    zero(self.meta_inc_rent_1),
                    zero(self.meta_inc_other_1),
                ),
            ],
        })
    }
}

/// Spreadsheet exports write integers as "26.0"; negative or NaN become 0.
fn whole(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.round() as u32
    } else {
        0
    }
}

fn row_out<'a>(bill: Option<&'a Bill>, meta: Option<&SnapshotMeta>) -> RowOut<'a> {
    let income = |i: usize| meta.map(|m| m.incomes[i]);
    RowOut {
        name: bill.map_or("", |b| b.name.as_str()),
        amount: bill.map_or(0.0, |b| b.amount),
        category: bill.map_or("", |b| b.category.as_str()),
        due_day: bill.map_or(0, |b| b.due_day),
        frequency: bill.map_or(Frequency::Monthly, |b| b.frequency).label(),
        annual_month: bill.map_or(0, |b| b.annual_month),
        meta_pay_date: meta.map(|m| m.pay_date.format("%Y-%m-%d").to_string()),
        meta_inc_pay_0: income(0).map(|i| i.pay),
        meta_inc_rent_0: income(0).map(|i| i.rent),
        meta_inc_other_0: income(0).map(|i| i.other),
        meta_inc_pay_1: income(1).map(|i| i.pay),
        meta_inc_rent_1: income(1).map(|i| i.rent),
        meta_inc_other_1: income(1).map(|i| i.other),
    }
}

/// Encode a snapshot as CSV.
///
/// With no bills, metadata goes on a single row with a blank name (skipped
/// as a bill on read). With neither, only the header is written.
pub fn write_snapshot<W: Write>(writer: W, snapshot: &Snapshot) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    let meta = snapshot.meta.as_ref();

    if snapshot.bills.is_empty() {
        if meta.is_some() {
            wtr.serialize(row_out(None, meta))?;
        } else {
            wtr.write_record(HEADER)?;
        }
    }
    for bill in &snapshot.bills {
        wtr.serialize(row_out(Some(bill), meta))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Decode a snapshot. Rows without a name are skipped; metadata comes from the first row.
pub fn read_snapshot<R: Read>(reader: R) -> Result<Snapshot, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bills = Vec::new();
    let mut meta = None;

    for (i, result) in rdr.deserialize::<RowIn>().enumerate() {
        let row = result?;
        if i == 0 {
            meta = row.to_meta();
        }
        match row.to_bill() {
            Some(bill) => bills.push(bill),
            None => debug!(row = i, "skipping snapshot row without a name"),
        }
    }

    Ok(Snapshot { bills, meta })
}
