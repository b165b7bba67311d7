use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use credit_tracker_core::{Entity, Money, PaymentId};

/// A settlement event. Append-only: never mutated after it is recorded.
///
/// Which withdrawals a payment paid down is not retained here; only its
/// aggregate effect on the ledger survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    id: PaymentId,
    amount: Money,
    date: NaiveDate,
}

impl Payment {
    pub(crate) fn new(id: PaymentId, amount: Money, date: NaiveDate) -> Self {
        Self { id, amount, date }
    }

    pub fn id_typed(&self) -> PaymentId {
        self.id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Entity for Payment {
    type Id = PaymentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
