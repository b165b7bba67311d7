//! Value objects: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

use core::iter::Sum;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// create a new one with the new values.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// A non-negative amount of money in the ledger's single currency.
///
/// Backed by an exact decimal, so sums and differences never drift: paying
/// `0.1` three times settles exactly `0.3`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Amount that must be strictly greater than zero (withdrawals, payments).
    pub fn positive(amount: Decimal) -> DomainResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "amount must be positive, got {amount}"
            )));
        }
        Ok(Self(amount))
    }

    /// Parse a decimal string entered at the boundary (form field, CLI argument).
    pub fn parse_positive(input: &str) -> DomainResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("amount is required"));
        }
        let amount = Decimal::from_str(trimmed).map_err(|e| {
            DomainError::validation(format!("amount `{trimmed}` is not a decimal number: {e}"))
        })?;
        Self::positive(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn min(self, other: Self) -> Self {
        if self <= other { self } else { other }
    }

    /// `self - other`, clamped at zero.
    pub fn saturating_sub(self, other: Self) -> Self {
        if other >= self {
            Self::zero()
        } else {
            Self(self.0 - other.0)
        }
    }

    /// `self + other`, or `None` if the sum does not fit in a decimal.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// `self + other`, clamped at the largest representable amount.
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// `self - other`, or `None` if the result would be negative.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        if other > self {
            None
        } else {
            Some(Self(self.0 - other.0))
        }
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::invariant(format!(
                "money cannot be negative, got {value}"
            )));
        }
        Ok(Self(value))
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

/// Saturating: a sum past the decimal range stays at the maximum instead of panicking.
impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Self::saturating_add)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
