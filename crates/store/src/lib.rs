//! Ledger persistence.
//!
//! The ledger is stored as one JSON document under a fixed key. Loading never
//! fails: a missing, unreadable or malformed document yields an empty ledger.

pub mod error;
pub mod file;
pub mod memory;
pub mod r#trait;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use r#trait::{DEFAULT_STORE_KEY, LedgerStore, decode_or_empty, encode};
