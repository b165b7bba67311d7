use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use credit_tracker_core::{
    Aggregate, DomainError, DomainResult, Money, PaymentId, WithdrawalId,
};

use crate::allocation::{Allocation, oldest_first, plan_allocation, sort_oldest_first};
use crate::payment::Payment;
use crate::stats::LedgerStats;
use crate::withdrawal::{Withdrawal, due_date_for, normalize_note};

/// Aggregate root: the personal debt/credit ledger.
///
/// Owned by the caller's session and passed around explicitly. Mutated only
/// through `RecordWithdrawal` and `RecordPayment`; persisting it afterwards is
/// the caller's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "LedgerDocument")]
pub struct Ledger {
    withdrawals: Vec<Withdrawal>,
    payments: Vec<Payment>,
    credit_balance: Money,
    version: u64,
}

/// Read-only view of the ledger's records, for display and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerSnapshot<'a> {
    pub withdrawals: &'a [Withdrawal],
    pub payments: &'a [Payment],
}

impl Ledger {
    /// Fresh ledger: no withdrawals, no payments, zero credit.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn withdrawals(&self) -> &[Withdrawal] {
        &self.withdrawals
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn credit_balance(&self) -> Money {
        self.credit_balance
    }

    pub fn withdrawal(&self, id: WithdrawalId) -> Option<&Withdrawal> {
        self.withdrawals.iter().find(|w| w.id_typed() == id)
    }

    pub fn payment(&self, id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id_typed() == id)
    }

    /// Withdrawals that still carry a balance, in ledger order.
    pub fn outstanding(&self) -> impl Iterator<Item = &Withdrawal> {
        self.withdrawals.iter().filter(|w| !w.is_settled())
    }

    /// Unsettled withdrawals whose due date has passed.
    pub fn overdue(&self, as_of: NaiveDate) -> Vec<&Withdrawal> {
        self.withdrawals.iter().filter(|w| w.is_overdue(as_of)).collect()
    }

    pub fn total_debt(&self) -> Money {
        self.withdrawals.iter().map(Withdrawal::remaining_amount).sum()
    }

    pub fn stats(&self, as_of: NaiveDate) -> LedgerStats {
        LedgerStats::compute(self, as_of)
    }

    pub fn snapshot(&self) -> LedgerSnapshot<'_> {
        LedgerSnapshot {
            withdrawals: &self.withdrawals,
            payments: &self.payments,
        }
    }

    /// Record a new debt under a freshly minted id.
    pub fn record_withdrawal(
        &mut self,
        amount: Money,
        date: NaiveDate,
        note: Option<String>,
    ) -> DomainResult<WithdrawalId> {
        let withdrawal_id = WithdrawalId::new();
        self.execute(&LedgerCommand::RecordWithdrawal(RecordWithdrawal {
            withdrawal_id,
            amount,
            date,
            note,
        }))?;
        Ok(withdrawal_id)
    }

    /// Record a payment under a freshly minted id and settle debts oldest first.
    pub fn record_payment(
        &mut self,
        amount: Money,
        date: NaiveDate,
    ) -> DomainResult<PaymentRecorded> {
        let events = self.execute(&LedgerCommand::RecordPayment(RecordPayment {
            payment_id: PaymentId::new(),
            amount,
            date,
        }))?;

        events
            .into_iter()
            .find_map(|event| match event {
                LedgerEvent::PaymentRecorded(recorded) => Some(recorded),
                LedgerEvent::WithdrawalRecorded(_) => None,
            })
            .ok_or_else(|| DomainError::invariant("payment command produced no payment event"))
    }
}

/// Command: RecordWithdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordWithdrawal {
    pub withdrawal_id: WithdrawalId,
    pub amount: Money,
    pub date: NaiveDate,
    pub note: Option<String>,
}

/// Command: RecordPayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayment {
    pub payment_id: PaymentId,
    pub amount: Money,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCommand {
    RecordWithdrawal(RecordWithdrawal),
    RecordPayment(RecordPayment),
}

/// Event: WithdrawalRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRecorded {
    pub withdrawal_id: WithdrawalId,
    pub amount: Money,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub due_date: NaiveDate,
}

/// Event: PaymentRecorded.
///
/// `allocations` describes how the payment was spread; it is not kept on the
/// resulting `Payment` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecorded {
    pub payment_id: PaymentId,
    pub amount: Money,
    pub date: NaiveDate,
    pub allocations: Vec<Allocation>,
    /// Surplus added to the credit balance.
    pub credited: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    WithdrawalRecorded(WithdrawalRecorded),
    PaymentRecorded(PaymentRecorded),
}

impl LedgerEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::WithdrawalRecorded(_) => "ledger.withdrawal_recorded",
            LedgerEvent::PaymentRecorded(_) => "ledger.payment_recorded",
        }
    }
}

impl Aggregate for Ledger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        tracing::trace!(
            event = event.event_type(),
            version = self.version + 1,
            "applying ledger event"
        );
        match event {
            LedgerEvent::WithdrawalRecorded(e) => {
                self.withdrawals.push(Withdrawal::recorded(
                    e.withdrawal_id,
                    e.amount,
                    e.date,
                    e.note.clone(),
                    e.due_date,
                ));
            }
            LedgerEvent::PaymentRecorded(e) => {
                // The stored order becomes the settlement order.
                sort_oldest_first(&mut self.withdrawals);
                let mut settlements: HashMap<WithdrawalId, Money> = e
                    .allocations
                    .iter()
                    .map(|a| (a.withdrawal_id, a.amount))
                    .collect();
                for w in &mut self.withdrawals {
                    if settlements.is_empty() {
                        break;
                    }
                    if let Some(amount) = settlements.remove(&w.id_typed()) {
                        w.settle(amount);
                    }
                }
                self.credit_balance = self.credit_balance.saturating_add(e.credited);
                self.payments.push(Payment::new(e.payment_id, e.amount, e.date));
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::RecordWithdrawal(cmd) => self.handle_record_withdrawal(cmd),
            LedgerCommand::RecordPayment(cmd) => self.handle_record_payment(cmd),
        }
    }
}

impl Ledger {
    fn checked_total_debt(&self) -> Option<Money> {
        self.withdrawals
            .iter()
            .try_fold(Money::zero(), |total, w| total.checked_add(w.remaining_amount()))
    }

    fn handle_record_withdrawal(&self, cmd: &RecordWithdrawal) -> DomainResult<Vec<LedgerEvent>> {
        if cmd.amount.is_zero() {
            return Err(DomainError::validation("withdrawal amount must be positive"));
        }
        if self.withdrawal(cmd.withdrawal_id).is_some() {
            return Err(DomainError::invariant(format!(
                "withdrawal {} already recorded",
                cmd.withdrawal_id
            )));
        }

        if self.checked_total_debt().and_then(|debt| debt.checked_add(cmd.amount)).is_none() {
            return Err(DomainError::validation(format!(
                "withdrawal of {} would push total debt past the largest representable amount",
                cmd.amount
            )));
        }

        // Existing credit is left alone: a new debt starts at its full amount.
        Ok(vec![LedgerEvent::WithdrawalRecorded(WithdrawalRecorded {
            withdrawal_id: cmd.withdrawal_id,
            amount: cmd.amount,
            date: cmd.date,
            note: normalize_note(cmd.note.clone()),
            due_date: due_date_for(cmd.date)?,
        })])
    }

    fn handle_record_payment(&self, cmd: &RecordPayment) -> DomainResult<Vec<LedgerEvent>> {
        if cmd.amount.is_zero() {
            return Err(DomainError::validation("payment amount must be positive"));
        }
        if self.payment(cmd.payment_id).is_some() {
            return Err(DomainError::invariant(format!(
                "payment {} already recorded",
                cmd.payment_id
            )));
        }

        let plan = plan_allocation(oldest_first(&self.withdrawals), cmd.amount);
        if cmd.amount.checked_sub(plan.surplus) != Some(plan.allocated()) {
            return Err(DomainError::invariant("allocation does not conserve the payment"));
        }
        if self.credit_balance.checked_add(plan.surplus).is_none() {
            return Err(DomainError::validation(format!(
                "payment of {} would push credit past the largest representable amount",
                cmd.amount
            )));
        }

        tracing::debug!(
            payment_id = %cmd.payment_id,
            amount = %cmd.amount,
            settled = plan.allocations.len(),
            surplus = %plan.surplus,
            "planned payment allocation"
        );

        Ok(vec![LedgerEvent::PaymentRecorded(PaymentRecorded {
            payment_id: cmd.payment_id,
            amount: cmd.amount,
            date: cmd.date,
            allocations: plan.allocations,
            credited: plan.surplus,
        })])
    }
}

/// Wire shape of a persisted ledger, checked before it becomes a `Ledger`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerDocument {
    #[serde(default)]
    withdrawals: Vec<Withdrawal>,
    #[serde(default)]
    payments: Vec<Payment>,
    #[serde(default)]
    credit_balance: Money,
    #[serde(default)]
    version: u64,
}

impl TryFrom<LedgerDocument> for Ledger {
    type Error = DomainError;

    fn try_from(doc: LedgerDocument) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        if let Some(dup) = doc.withdrawals.iter().find(|w| !seen.insert(w.id_typed())) {
            return Err(DomainError::invariant(format!(
                "duplicate withdrawal id {}",
                dup.id_typed()
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = doc.payments.iter().find(|p| !seen.insert(p.id_typed())) {
            return Err(DomainError::invariant(format!(
                "duplicate payment id {}",
                dup.id_typed()
            )));
        }

        Ok(Self {
            withdrawals: doc.withdrawals,
            payments: doc.payments,
            credit_balance: doc.credit_balance,
            version: doc.version,
        })
    }
}
