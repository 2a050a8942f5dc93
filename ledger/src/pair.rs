//! Directed per-pair ledger entries.

use netsettle_common::{NetSettleError, PartyId, PaymentType, Result};
use serde::{Deserialize, Serialize};

/// Everything `debtor` owes `creditor`, folded over all raw transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairLedger {
    /// Party that owes.
    pub debtor: PartyId,
    /// Party that is owed.
    pub creditor: PartyId,
    /// Cumulative amount.
    pub amount: i64,
    /// Number of transactions folded into this entry.
    pub count: usize,
    /// Payment type of the most recent transaction.
    pub payment_type: PaymentType,
}

impl PairLedger {
    /// Start a pair ledger from its first transaction.
    pub fn new(debtor: PartyId, creditor: PartyId, amount: i64, payment_type: PaymentType) -> Self {
        Self {
            debtor,
            creditor,
            amount,
            count: 1,
            payment_type,
        }
    }

    /// Amount after folding `amount` in, without mutating.
    pub fn checked_total(&self, amount: i64) -> Result<i64> {
        self.amount
            .checked_add(amount)
            .ok_or_else(|| NetSettleError::AmountOverflow {
                party: self.creditor.clone(),
            })
    }

    /// Fold another transaction into this pair.
    pub fn fold(&mut self, amount: i64, payment_type: PaymentType) -> Result<()> {
        self.amount = self.checked_total(amount)?;
        self.count += 1;
        self.payment_type = payment_type;
        Ok(())
    }
}
