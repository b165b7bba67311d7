//! End-to-end session flow over the JSON file store.

use std::fs;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tempfile::tempdir;

use credit_tracker_app::{CreditTracker, TrackerError};
use credit_tracker_store::{JsonFileStore, LedgerStore};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn sessions_share_state_through_the_file_store() {
    let dir = tempdir().unwrap();

    {
        let mut tracker = CreditTracker::open(JsonFileStore::new(dir.path()));
        tracker.record_withdrawal("50", "2024-02-01", "phone").unwrap();
        tracker.record_withdrawal("50", "2024-01-01", "rent").unwrap();
    }

    {
        let mut tracker = CreditTracker::open(JsonFileStore::new(dir.path()));
        let recorded = tracker.record_payment("60", "2024-02-10").unwrap();
        assert_eq!(recorded.allocations.len(), 2);
        assert!(recorded.credited.is_zero());
    }

    let tracker = CreditTracker::open(JsonFileStore::new(dir.path()));
    let snapshot = tracker.ledger();
    let rows: Vec<_> = snapshot
        .withdrawals
        .iter()
        .map(|w| (w.note().unwrap_or_default().to_string(), w.remaining_amount().amount()))
        .collect();
    assert_eq!(
        rows,
        vec![("rent".to_string(), dec!(0)), ("phone".to_string(), dec!(40))]
    );
    assert_eq!(snapshot.payments.len(), 1);

    let stats = tracker.stats_as_of(date("2024-02-28"));
    assert_eq!(stats.total_debt.amount(), dec!(40));
    assert_eq!(stats.upcoming_7_days.amount(), dec!(40));
    assert_eq!(stats.net_debt, dec!(40));
}

#[test]
fn overpayment_becomes_credit_and_is_not_auto_applied() {
    let dir = tempdir().unwrap();
    let mut tracker = CreditTracker::open(JsonFileStore::new(dir.path()));

    tracker.record_withdrawal("100", "2024-01-01", "rent").unwrap();
    tracker.record_payment("150", "2024-01-15").unwrap();
    tracker.record_withdrawal("30", "2024-01-20", "").unwrap();

    let stats = tracker.stats_as_of(date("2024-01-20"));
    assert_eq!(stats.total_debt.amount(), dec!(30));
    assert_eq!(stats.credit_balance.amount(), dec!(50));
    assert_eq!(stats.net_debt, dec!(-20));

    let persisted = JsonFileStore::new(dir.path()).load();
    assert_eq!(persisted.credit_balance().amount(), dec!(50));
    assert_eq!(persisted.withdrawals().len(), 2);
}

#[test]
fn corrupt_document_starts_a_fresh_ledger() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    fs::write(store.path(), "definitely not json").unwrap();

    let mut tracker = CreditTracker::open(store);
    assert!(tracker.ledger().withdrawals.is_empty());

    tracker.record_withdrawal("12.34", "2024-03-01", "").unwrap();
    let reloaded = JsonFileStore::new(dir.path()).load();
    assert_eq!(reloaded.total_debt().amount(), dec!(12.34));
}

#[test]
fn rejected_input_reports_a_domain_error() {
    let dir = tempdir().unwrap();
    let mut tracker = CreditTracker::open(JsonFileStore::new(dir.path()));

    let err = tracker.record_payment("twelve", "2024-03-01").unwrap_err();

    assert!(matches!(err, TrackerError::Domain(_)));
    assert!(!JsonFileStore::new(dir.path()).path().exists());
}

#[test]
fn export_writes_both_sheets() {
    let dir = tempdir().unwrap();
    let mut tracker = CreditTracker::open(JsonFileStore::new(dir.path().join("data")));
    tracker.record_withdrawal("20", "2024-01-01", "coffee").unwrap();
    tracker.record_payment("5", "2024-01-02").unwrap();

    let written = tracker.export_to(&dir.path().join("out")).unwrap();

    assert_eq!(written.len(), 2);
    let withdrawals = fs::read_to_string(&written[0]).unwrap();
    assert!(withdrawals.starts_with("id,amount,remainingAmount,date,note,dueDate"));
    assert!(withdrawals.contains(",20,15,2024-01-01,coffee,2024-01-31"));
    let payments = fs::read_to_string(&written[1]).unwrap();
    assert_eq!(payments.lines().count(), 2);
}
