//! Session service: one ledger, one store, save after every mutation.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use credit_tracker_core::{Money, WithdrawalId, parse_date};
use credit_tracker_export::Workbook;
use credit_tracker_ledger::{Ledger, LedgerSnapshot, LedgerStats, PaymentRecorded};
use credit_tracker_store::LedgerStore;

use crate::error::TrackerError;

/// The caller-facing ledger operations.
///
/// Inputs arrive as raw strings (form fields, CLI arguments) and are validated
/// before the ledger is touched, so a rejected input changes nothing in memory
/// or on disk. A mutation whose save fails is rolled back.
#[derive(Debug)]
pub struct CreditTracker<S: LedgerStore> {
    ledger: Ledger,
    store: S,
}

impl<S: LedgerStore> CreditTracker<S> {
    /// Start a session from whatever the store holds (empty if nothing usable).
    pub fn open(store: S) -> Self {
        let ledger = store.load();
        tracing::debug!(
            withdrawals = ledger.withdrawals().len(),
            payments = ledger.payments().len(),
            "opened ledger session"
        );
        Self { ledger, store }
    }

    pub fn record_withdrawal(
        &mut self,
        amount: &str,
        date: &str,
        note: &str,
    ) -> Result<WithdrawalId, TrackerError> {
        let amount = Money::parse_positive(amount)?;
        let date = parse_date(date)?;

        let before = self.ledger.clone();
        let id = self
            .ledger
            .record_withdrawal(amount, date, Some(note.to_string()))?;
        self.persist(before)?;

        tracing::info!(withdrawal_id = %id, %amount, %date, "recorded withdrawal");
        Ok(id)
    }

    pub fn record_payment(
        &mut self,
        amount: &str,
        date: &str,
    ) -> Result<PaymentRecorded, TrackerError> {
        let amount = Money::parse_positive(amount)?;
        let date = parse_date(date)?;

        let before = self.ledger.clone();
        let recorded = self.ledger.record_payment(amount, date)?;
        self.persist(before)?;

        tracing::info!(
            payment_id = %recorded.payment_id,
            %amount,
            %date,
            settled = recorded.allocations.len(),
            credited = %recorded.credited,
            "recorded payment"
        );
        Ok(recorded)
    }

    /// Save the current ledger, or put `before` back if the store refuses it.
    fn persist(&mut self, before: Ledger) -> Result<(), TrackerError> {
        if let Err(err) = self.store.save(&self.ledger) {
            tracing::warn!(error = %err, "failed to save ledger; rolling back");
            self.ledger = before;
            return Err(err.into());
        }
        Ok(())
    }

    /// Balances as of today's local date.
    pub fn stats(&self) -> LedgerStats {
        self.stats_as_of(today())
    }

    pub fn stats_as_of(&self, as_of: NaiveDate) -> LedgerStats {
        self.ledger.stats(as_of)
    }

    pub fn ledger(&self) -> LedgerSnapshot<'_> {
        self.ledger.snapshot()
    }

    /// Export the records as one CSV file per sheet under `dir`.
    pub fn export_to(&self, dir: &Path) -> Result<Vec<PathBuf>, TrackerError> {
        let written = Workbook::from_snapshot(&self.ledger.snapshot()).write_dir(dir)?;
        tracing::info!(dir = %dir.display(), files = written.len(), "exported ledger");
        Ok(written)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
