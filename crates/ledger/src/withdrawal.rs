use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use credit_tracker_core::{DomainError, DomainResult, Entity, Money, WithdrawalId};

/// Days between incurring a debt and its due date.
pub const DUE_PERIOD_DAYS: u64 = 30;

/// Due date of a debt incurred on `date`.
pub fn due_date_for(date: NaiveDate) -> DomainResult<NaiveDate> {
    date.checked_add_days(Days::new(DUE_PERIOD_DAYS))
        .ok_or_else(|| DomainError::validation(format!("due date for {date} is out of range")))
}

/// A single debt with its own amortizing balance.
///
/// `amount`, `date` and `due_date` are fixed at creation. Only
/// `remaining_amount` changes, and only downwards, as payments settle it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WithdrawalRecord")]
pub struct Withdrawal {
    id: WithdrawalId,
    amount: Money,
    remaining_amount: Money,
    date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    due_date: NaiveDate,
}

impl Withdrawal {
    pub(crate) fn recorded(
        id: WithdrawalId,
        amount: Money,
        date: NaiveDate,
        note: Option<String>,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            amount,
            remaining_amount: amount,
            date,
            note,
            due_date,
        }
    }

    pub fn id_typed(&self) -> WithdrawalId {
        self.id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn remaining_amount(&self) -> Money {
        self.remaining_amount
    }

    /// Portion of the original amount already paid down.
    pub fn settled_amount(&self) -> Money {
        self.amount.saturating_sub(self.remaining_amount)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn is_settled(&self) -> bool {
        self.remaining_amount.is_zero()
    }

    /// Signed calendar days from `as_of` to the due date (negative once overdue).
    pub fn days_until_due(&self, as_of: NaiveDate) -> i64 {
        (self.due_date - as_of).num_days()
    }

    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        !self.is_settled() && self.due_date < as_of
    }

    /// Pay down up to `available`; returns how much was actually applied.
    pub(crate) fn settle(&mut self, available: Money) -> Money {
        let applied = available.min(self.remaining_amount);
        self.remaining_amount = self.remaining_amount.saturating_sub(applied);
        applied
    }
}

impl Entity for Withdrawal {
    type Id = WithdrawalId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Blank notes are not worth keeping.
pub(crate) fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Wire shape of a persisted withdrawal, checked before it becomes a `Withdrawal`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WithdrawalRecord {
    id: WithdrawalId,
    amount: Money,
    remaining_amount: Money,
    date: NaiveDate,
    #[serde(default)]
    note: Option<String>,
    due_date: NaiveDate,
}

impl TryFrom<WithdrawalRecord> for Withdrawal {
    type Error = DomainError;

    fn try_from(record: WithdrawalRecord) -> Result<Self, Self::Error> {
        if record.amount.is_zero() {
            return Err(DomainError::invariant(format!(
                "withdrawal {} has a zero amount",
                record.id
            )));
        }
        if record.remaining_amount > record.amount {
            return Err(DomainError::invariant(format!(
                "withdrawal {} remaining {} exceeds amount {}",
                record.id, record.remaining_amount, record.amount
            )));
        }
        let expected_due = due_date_for(record.date)?;
        if record.due_date != expected_due {
            return Err(DomainError::invariant(format!(
                "withdrawal {} is due {}, expected {expected_due}",
                record.id, record.due_date
            )));
        }
        Ok(Self {
            id: record.id,
            amount: record.amount,
            remaining_amount: record.remaining_amount,
            date: record.date,
            note: normalize_note(record.note),
            due_date: record.due_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn withdrawal(amount: rust_decimal::Decimal) -> Withdrawal {
        let incurred = date("2024-01-01");
        Withdrawal::recorded(
            WithdrawalId::new(),
            Money::positive(amount).unwrap(),
            incurred,
            None,
            due_date_for(incurred).unwrap(),
        )
    }

    #[test]
    fn due_date_is_thirty_days_out() {
        assert_eq!(due_date_for(date("2024-01-01")).unwrap(), date("2024-01-31"));
        assert_eq!(due_date_for(date("2024-02-15")).unwrap(), date("2024-03-16"));
    }

    #[test]
    fn settle_caps_at_remaining_amount() {
        let mut w = withdrawal(dec!(50));
        assert_eq!(w.settle(Money::positive(dec!(20)).unwrap()).amount(), dec!(20));
        assert_eq!(w.remaining_amount().amount(), dec!(30));
        assert_eq!(w.settle(Money::positive(dec!(100)).unwrap()).amount(), dec!(30));
        assert!(w.is_settled());
        assert_eq!(w.settled_amount(), w.amount());
    }

    #[test]
    fn days_until_due_goes_negative_when_overdue() {
        let w = withdrawal(dec!(10));
        assert_eq!(w.days_until_due(date("2024-01-28")), 3);
        assert_eq!(w.days_until_due(date("2024-02-02")), -2);
        assert!(w.is_overdue(date("2024-02-01")));
        assert!(!w.is_overdue(date("2024-01-31")));
    }

    #[test]
    fn blank_notes_are_dropped() {
        assert_eq!(normalize_note(Some("  ".to_string())), None);
        assert_eq!(normalize_note(Some(" rent ".to_string())), Some("rent".to_string()));
    }

    #[test]
    fn stored_record_must_keep_the_thirty_day_due_date() {
        let record = |due: &str| {
            serde_json::json!({
                "id": "01890a5d-ac96-774b-bcce-b302099a8057",
                "amount": "50",
                "remainingAmount": "20",
                "date": "2024-01-01",
                "dueDate": due,
            })
        };

        let w: Withdrawal = serde_json::from_value(record("2024-01-31")).unwrap();
        assert_eq!(w.settled_amount().amount(), dec!(30));
        assert!(serde_json::from_value::<Withdrawal>(record("2024-02-15")).is_err());
    }

    #[test]
    fn stored_record_needs_a_uuid_id() {
        let doc = serde_json::json!({
            "id": "1704067200000",
            "amount": 50,
            "remainingAmount": 50,
            "date": "2024-01-01",
            "dueDate": "2024-01-31",
        });
        assert!(serde_json::from_value::<Withdrawal>(doc).is_err());
    }
}
