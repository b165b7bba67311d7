//! `credit-tracker-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod date;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::Aggregate;
pub use date::{ISO_DATE_FORMAT, parse_date};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{PaymentId, WithdrawalId};
pub use value_object::{Money, ValueObject};
