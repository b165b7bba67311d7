//! Tabular export of the ledger records.
//!
//! A `Workbook` holds two sheets, "Withdrawals" and "Payments", one row per
//! record. Each sheet is rendered as CSV.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use thiserror::Error;

use credit_tracker_core::ISO_DATE_FORMAT;
use credit_tracker_ledger::{LedgerSnapshot, Payment, Withdrawal};

pub const WITHDRAWALS_SHEET: &str = "Withdrawals";
pub const PAYMENTS_SHEET: &str = "Payments";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One named table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Render as CSV: header row first, then one row per record.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut wrt = WriterBuilder::new().from_writer(writer);
        wrt.write_record(&self.header)?;
        for row in &self.rows {
            wrt.write_record(row)?;
        }
        wrt.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn from_snapshot(snapshot: &LedgerSnapshot<'_>) -> Self {
        let mut withdrawals = Sheet::new(
            WITHDRAWALS_SHEET,
            &["id", "amount", "remainingAmount", "date", "note", "dueDate"],
        );
        withdrawals.rows = snapshot.withdrawals.iter().map(withdrawal_row).collect();

        let mut payments = Sheet::new(PAYMENTS_SHEET, &["id", "amount", "date"]);
        payments.rows = snapshot.payments.iter().map(payment_row).collect();

        Self {
            sheets: vec![withdrawals, payments],
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Write every sheet to `<dir>/<sheet name>.csv`; returns the written paths.
    pub fn write_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ExportError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.sheets.len());
        for sheet in &self.sheets {
            let path = dir.join(format!("{}.csv", sheet.name));
            let file = fs::File::create(&path)?;
            sheet.write_csv(file)?;
            tracing::debug!(
                sheet = %sheet.name,
                rows = sheet.rows.len(),
                path = %path.display(),
                "exported sheet"
            );
            written.push(path);
        }
        Ok(written)
    }
}

fn withdrawal_row(w: &Withdrawal) -> Vec<String> {
    vec![
        w.id_typed().to_string(),
        w.amount().to_string(),
        w.remaining_amount().to_string(),
        w.date().format(ISO_DATE_FORMAT).to_string(),
        w.note().unwrap_or_default().to_string(),
        w.due_date().format(ISO_DATE_FORMAT).to_string(),
    ]
}

fn payment_row(p: &Payment) -> Vec<String> {
    vec![
        p.id_typed().to_string(),
        p.amount().to_string(),
        p.date().format(ISO_DATE_FORMAT).to_string(),
    ]
}
