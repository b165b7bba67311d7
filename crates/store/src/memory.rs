use std::sync::RwLock;

use credit_tracker_ledger::Ledger;

use crate::error::StoreError;
use crate::r#trait::{LedgerStore, decode_or_empty, encode};

/// In-memory ledger store.
///
/// Keeps the serialized document rather than the `Ledger` value, so loads go
/// through the same decoding path as the file store. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    document: RwLock<Option<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a raw document (e.g. to simulate corrupt state).
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: RwLock::new(Some(document.into())),
        }
    }

    /// The raw document as last saved.
    pub fn document(&self) -> Option<String> {
        self.document.read().ok().and_then(|doc| doc.clone())
    }
}

impl LedgerStore for InMemoryStore {
    fn load(&self) -> Ledger {
        let guard = match self.document.read() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::warn!("in-memory ledger store lock poisoned; starting empty");
                return Ledger::empty();
            }
        };

        match guard.as_deref() {
            Some(document) => decode_or_empty(document, "memory"),
            None => Ledger::empty(),
        }
    }

    fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let document = encode(ledger)?;
        let mut guard = self.document.write().map_err(|_| StoreError::LockPoisoned)?;
        *guard = Some(document);
        Ok(())
    }
}
