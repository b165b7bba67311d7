//! `credit-tracker-app` — composition boundary.
//!
//! Wires the ledger to its store for one session: every recorded withdrawal or
//! payment is validated here, applied to the in-memory ledger, then saved.

pub mod config;
pub mod error;
pub mod service;

pub use config::Config;
pub use error::TrackerError;
pub use service::CreditTracker;
