use credit_tracker_ledger::Ledger;

use crate::error::StoreError;

/// Process-wide identifier the ledger document is stored under.
pub const DEFAULT_STORE_KEY: &str = "credit_tracker_data";

/// Durable home of the ledger snapshot.
pub trait LedgerStore: Send + Sync {
    /// Restore the last saved ledger, or an empty one if there is nothing usable.
    fn load(&self) -> Ledger;

    /// Persist the full ledger snapshot, replacing the previous one.
    fn save(&self, ledger: &Ledger) -> Result<(), StoreError>;
}

/// Serialize a ledger into its stored document form.
pub fn encode(ledger: &Ledger) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(ledger)?)
}

/// Parse a stored document, falling back to an empty ledger if it is malformed.
pub fn decode_or_empty(document: &str, source: &str) -> Ledger {
    match serde_json::from_str::<Ledger>(document) {
        Ok(ledger) => ledger,
        Err(err) => {
            tracing::warn!(%source, error = %err, "stored ledger is malformed; starting empty");
            Ledger::empty()
        }
    }
}
