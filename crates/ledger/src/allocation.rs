//! Oldest-debt-first settlement.

use serde::{Deserialize, Serialize};

use credit_tracker_core::{Money, WithdrawalId};

use crate::withdrawal::Withdrawal;

/// Part of a payment applied to one withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub withdrawal_id: WithdrawalId,
    pub amount: Money,
}

/// Outcome of walking the outstanding debts with one payment.
///
/// `allocations` sum plus `surplus` always equals the payment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AllocationPlan {
    pub allocations: Vec<Allocation>,
    pub surplus: Money,
}

impl AllocationPlan {
    pub fn allocated(&self) -> Money {
        self.allocations.iter().map(|a| a.amount).sum()
    }
}

/// Reorder withdrawals oldest debt first.
///
/// The sort is stable: debts incurred on the same day keep their insertion order.
pub fn sort_oldest_first(withdrawals: &mut [Withdrawal]) {
    withdrawals.sort_by_key(Withdrawal::date);
}

/// Settlement order for `withdrawals` without reordering the slice itself.
pub fn oldest_first(withdrawals: &[Withdrawal]) -> Vec<&Withdrawal> {
    let mut ordered: Vec<&Withdrawal> = withdrawals.iter().collect();
    ordered.sort_by_key(|w| w.date());
    ordered
}

/// Walk `ordered` and pay down each unsettled withdrawal in turn.
///
/// Settled withdrawals are skipped. The walk stops as soon as the payment is
/// exhausted; whatever is left after the last withdrawal is surplus.
pub fn plan_allocation<'a, I>(ordered: I, payment: Money) -> AllocationPlan
where
    I: IntoIterator<Item = &'a Withdrawal>,
{
    let mut remaining = payment;
    let mut allocations = Vec::new();

    for withdrawal in ordered {
        if remaining.is_zero() {
            break;
        }
        if withdrawal.is_settled() {
            continue;
        }

        let applied = remaining.min(withdrawal.remaining_amount());
        remaining = remaining.saturating_sub(applied);
        allocations.push(Allocation {
            withdrawal_id: withdrawal.id_typed(),
            amount: applied,
        });
    }

    AllocationPlan {
        allocations,
        surplus: remaining,
    }
}
