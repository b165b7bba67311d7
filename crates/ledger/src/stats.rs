//! Derived balances. Computed on demand, never stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use credit_tracker_core::Money;

use crate::ledger::Ledger;

/// Withdrawals due within this many days (or already overdue) count as upcoming.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStats {
    /// Sum of every withdrawal's remaining amount.
    pub total_debt: Money,
    pub credit_balance: Money,
    /// `total_debt - credit_balance`; negative when credit exceeds debt.
    pub net_debt: Decimal,
    /// Remaining debt due within the window, overdue debt included.
    #[serde(rename = "upcoming7Days")]
    pub upcoming_7_days: Money,
}

impl LedgerStats {
    pub fn compute(ledger: &Ledger, as_of: NaiveDate) -> Self {
        let total_debt = ledger.total_debt();
        let credit_balance = ledger.credit_balance();
        let upcoming_7_days = ledger
            .outstanding()
            .filter(|w| w.days_until_due(as_of) <= UPCOMING_WINDOW_DAYS)
            .map(|w| w.remaining_amount())
            .sum();

        Self {
            total_debt,
            credit_balance,
            net_debt: total_debt.amount() - credit_balance.amount(),
            upcoming_7_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn money(amount: Decimal) -> Money {
        Money::positive(amount).unwrap()
    }

    #[test]
    fn empty_ledger_has_zero_stats() {
        let stats = Ledger::empty().stats(date("2024-01-01"));
        assert!(stats.total_debt.is_zero());
        assert!(stats.credit_balance.is_zero());
        assert_eq!(stats.net_debt, Decimal::ZERO);
        assert!(stats.upcoming_7_days.is_zero());
    }

    #[test]
    fn upcoming_window_includes_near_and_overdue_debts() {
        let today = date("2024-03-01");
        let mut ledger = Ledger::empty();
        // Due 2024-03-04, three days out.
        ledger.record_withdrawal(money(dec!(20)), date("2024-02-03"), None).unwrap();
        // Due 2024-03-11, ten days out.
        ledger.record_withdrawal(money(dec!(40)), date("2024-02-10"), None).unwrap();

        assert_eq!(ledger.stats(today).upcoming_7_days.amount(), dec!(20));

        // Due 2024-02-20, already overdue.
        ledger.record_withdrawal(money(dec!(5)), date("2024-01-21"), None).unwrap();
        assert_eq!(ledger.stats(today).upcoming_7_days.amount(), dec!(25));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let mut ledger = Ledger::empty();
        // Due 2024-01-31.
        ledger.record_withdrawal(money(dec!(9)), date("2024-01-01"), None).unwrap();

        assert_eq!(ledger.stats(date("2024-01-24")).upcoming_7_days.amount(), dec!(9));
        assert!(ledger.stats(date("2024-01-23")).upcoming_7_days.is_zero());
    }

    #[test]
    fn settled_debts_drop_out_of_the_window() {
        let mut ledger = Ledger::empty();
        ledger.record_withdrawal(money(dec!(30)), date("2024-01-01"), None).unwrap();
        ledger.record_payment(money(dec!(30)), date("2024-01-10")).unwrap();

        let stats = ledger.stats(date("2024-01-30"));
        assert!(stats.upcoming_7_days.is_zero());
        assert!(stats.total_debt.is_zero());
    }

    #[test]
    fn serializes_with_presentation_field_names() {
        let stats = Ledger::empty().stats(date("2024-01-01"));
        let value = serde_json::to_value(stats).unwrap();
        for key in ["totalDebt", "creditBalance", "netDebt", "upcoming7Days"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
