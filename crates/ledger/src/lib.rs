//! Ledger module: withdrawals, payments and oldest-first settlement.
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod allocation;
pub mod ledger;
pub mod payment;
pub mod stats;
pub mod withdrawal;

pub use allocation::{Allocation, AllocationPlan, plan_allocation};
pub use ledger::{
    Ledger, LedgerCommand, LedgerEvent, LedgerSnapshot, PaymentRecorded, RecordPayment,
    RecordWithdrawal, WithdrawalRecorded,
};
pub use payment::Payment;
pub use stats::{LedgerStats, UPCOMING_WINDOW_DAYS};
pub use withdrawal::{DUE_PERIOD_DAYS, Withdrawal, due_date_for};
