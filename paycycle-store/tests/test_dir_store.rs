use chrono::NaiveDate;
use paycycle_core::{BillBook, PayWindow, PeriodIncome, default_incomes, plan_cycle};
use paycycle_store::{DirStore, Snapshot, SnapshotMeta, SnapshotStore, StoreError};
use std::fs;
use tempfile::TempDir;

fn store_with_temp_dir() -> (DirStore, TempDir) {
    let temp = TempDir::new().expect("temp dir");
    let store = DirStore::new(temp.path().join("snapshots"));
    (store, temp)
}

fn march_snapshot() -> Snapshot {
    let pay_date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
    Snapshot::new(
        BillBook::default().bills().to_vec(),
        Some(SnapshotMeta::new(
            pay_date,
            &default_incomes(2, 2449.0, 2100.0, 0.0),
        )),
    )
}

/// Close a month, list it, and read it back unchanged.
#[test]
fn test_save_list_load() {
    let (store, _guard) = store_with_temp_dir();
    let snapshot = march_snapshot();

    store.save("Budget_Mar_2025", &snapshot).expect("save");
    assert_eq!(store.list_labels(), vec!["Budget_Mar_2025".to_string()]);

    let loaded = store.load("Budget_Mar_2025").expect("load");
    assert_eq!(loaded, snapshot);

    // Loaded bills plan exactly like the saved ones.
    let meta = loaded.meta.unwrap();
    let windows = PayWindow::cycle(meta.pay_date, false);
    let plan = plan_cycle(&loaded.bills, &windows, &meta.incomes);
    assert!(plan.orphans.is_empty());
    assert_eq!(plan.periods[0].income, PeriodIncome::new(2449.0, 2100.0, 0.0));
}

/// Saving the same label twice keeps only the last write.
#[test]
fn test_last_write_wins() {
    let (store, _guard) = store_with_temp_dir();
    let mut snapshot = march_snapshot();
    store.save("Budget_Mar_2025", &snapshot).unwrap();

    snapshot.bills.truncate(3);
    store.save("Budget_Mar_2025", &snapshot).unwrap();

    assert_eq!(store.load("Budget_Mar_2025").unwrap().bills.len(), 3);
    assert_eq!(store.list_labels().len(), 1);
}

/// Latest is chosen by parsed month, not by file name order.
#[test]
fn test_latest_label_across_years() {
    let (store, _guard) = store_with_temp_dir();
    let snapshot = march_snapshot();
    for label in ["Budget_Dec_2024", "Budget_Apr_2025", "Budget_Feb_2025"] {
        store.save(label, &snapshot).unwrap();
    }
    // Hand-named copies are listed but sort last.
    fs::write(store.dir().join("Budget_scratch.csv"), "name,amount
Gym,30
").unwrap();
    assert_eq!(store.list_labels().len(), 4);
    assert_eq!(store.latest().as_deref(), Some("Budget_Apr_2025"));
}

/// Non-snapshot files in the directory are ignored; missing labels are absent.
#[test]
fn test_foreign_files_ignored() {
    let (store, _guard) = store_with_temp_dir();
    store.save("Budget_Jan_2025", &march_snapshot()).unwrap();
    fs::write(store.dir().join("notes.csv"), "hello").unwrap();
    fs::write(store.dir().join("Budget_Feb_2025.txt"), "x").unwrap();
    fs::write(store.dir().join("Budget_Mar_2025.csv"), "name,amount\n\"unterminated").unwrap();

    let labels = store.list_labels();
    assert_eq!(labels, vec!["Budget_Jan_2025".to_string(), "Budget_Mar_2025".to_string()]);
    assert!(store.load("Budget_Missing_2025").is_none());
}

/// Labels that would never be listed are refused, so nothing is written.
#[test]
fn test_invalid_label_rejected() {
    let (store, _guard) = store_with_temp_dir();
    for label in ["../escape", "March", "Budget_March_2025", "Budget_scratch"] {
        let err = store.save(label, &march_snapshot()).unwrap_err();
        assert!(matches!(err, StoreError::InvalidLabel(_)), "{label}");
    }
    assert!(store.list_labels().is_empty());
    assert!(store.latest().is_none());
    assert!(!store.dir().exists() || fs::read_dir(store.dir()).unwrap().next().is_none());
}

/// A month closed with no bills still remembers its pay date and income.
#[test]
fn test_empty_month_keeps_meta() {
    let (store, _guard) = store_with_temp_dir();
    let mut snapshot = march_snapshot();
    snapshot.bills.clear();

    store.save("Budget_Mar_2025", &snapshot).unwrap();
    let loaded = store.load("Budget_Mar_2025").unwrap();
    assert!(loaded.bills.is_empty());
    assert_eq!(loaded.meta, snapshot.meta);
}

/// A failed rename leaves no temp file behind.
#[test]
fn test_failed_save_removes_temp_file() {
    let (store, _guard) = store_with_temp_dir();
    // A non-empty directory where the snapshot file should go.
    let target = store.path_for("Budget_Mar_2025");
    fs::create_dir_all(target.join("blocker")).unwrap();

    let err = store.save("Budget_Mar_2025", &march_snapshot()).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(!target.with_extension("tmp").exists());
    assert!(target.is_dir());
}
