use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use credit_tracker_ledger::Ledger;

use crate::error::StoreError;
use crate::r#trait::{DEFAULT_STORE_KEY, LedgerStore, decode_or_empty, encode};

/// Ledger document stored as `<dir>/<key>.json`.
///
/// Saves go to a sibling temp file that is renamed over the target, so a crash
/// mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store under the default key in `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_key(dir, DEFAULT_STORE_KEY)
    }

    pub fn with_key(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Ledger {
        match fs::read_to_string(&self.path) {
            Ok(document) => {
                let ledger = decode_or_empty(&document, &self.path.display().to_string());
                tracing::debug!(
                    path = %self.path.display(),
                    withdrawals = ledger.withdrawals().len(),
                    payments = ledger.payments().len(),
                    "loaded ledger"
                );
                ledger
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no stored ledger; starting empty");
                Ledger::empty()
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "stored ledger is unreadable; starting empty"
                );
                Ledger::empty()
            }
        }
    }

    fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let document = encode(ledger)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        {
            let mut file = fs::File::create(&temp)?;
            file.write_all(document.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;

        tracing::debug!(path = %self.path.display(), bytes = document.len(), "saved ledger");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use credit_tracker_core::Money;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::empty();
        ledger
            .record_withdrawal(
                Money::positive(dec!(50)).unwrap(),
                date("2024-02-01"),
                Some("groceries".to_string()),
            )
            .unwrap();
        ledger
            .record_withdrawal(Money::positive(dec!(50)).unwrap(), date("2024-01-01"), None)
            .unwrap();
        ledger
            .record_payment(Money::positive(dec!(60.10)).unwrap(), date("2024-02-10"))
            .unwrap();
        ledger
    }

    #[test]
    fn missing_file_loads_empty_ledger() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert_eq!(store.load(), Ledger::empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));
        let ledger = sample_ledger();

        store.save(&ledger).unwrap();
        let loaded = store.load();

        assert_eq!(loaded, ledger);
        assert_eq!(loaded.withdrawals()[1].remaining_amount().amount(), dec!(39.90));
        assert!(store.path().ends_with("credit_tracker_data.json"));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn save_replaces_previous_snapshot() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::with_key(dir.path(), "ledger");
        store.save(&sample_ledger()).unwrap();

        store.save(&Ledger::empty()).unwrap();

        assert_eq!(store.load(), Ledger::empty());
    }

    #[test]
    fn corrupt_file_loads_empty_ledger() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        fs::write(store.path(), "{\"withdrawals\": [ {\"id\": 1").unwrap();

        assert_eq!(store.load(), Ledger::empty());
    }

    #[test]
    fn unreadable_path_loads_empty_ledger() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        // A directory where the document should be cannot be read as a file.
        fs::create_dir_all(store.path()).unwrap();

        assert_eq!(store.load(), Ledger::empty());
    }

    #[test]
    fn accepts_numeric_amounts_in_documents() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let document = r#"{
            "withdrawals": [{
                "id": "01890a5d-ac96-774b-bcce-b302099a8057",
                "amount": 100,
                "remainingAmount": 25.5,
                "date": "2024-01-01",
                "note": "rent",
                "dueDate": "2024-01-31"
            }],
            "payments": [{
                "id": "01890a5d-ac96-774b-bcce-b302099a8058",
                "amount": 74.5,
                "date": "2024-01-10"
            }],
            "creditBalance": 0
        }"#;
        fs::write(store.path(), document).unwrap();

        let ledger = store.load();

        assert_eq!(ledger.withdrawals().len(), 1);
        assert_eq!(ledger.payments().len(), 1);
        assert_eq!(ledger.total_debt().amount(), dec!(25.5));
        assert_eq!(ledger.withdrawals()[0].note(), Some("rent"));
    }
}
