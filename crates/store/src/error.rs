use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ledger storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("ledger store lock poisoned")]
    LockPoisoned,
}
