//! Input IOUs and the transfers settlement produces.

use serde::{Deserialize, Serialize};

use crate::{PartyId, PaymentType};

/// A single IOU: `debtor` owes `creditor` the given amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Party that owes.
    pub debtor: PartyId,
    /// Party that is owed.
    pub creditor: PartyId,
    /// Amount owed. Must be positive.
    pub amount: i64,
    /// Requested payment type. Resolved from both parties' lists when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
}

impl RawTransaction {
    /// Create a new transaction with the payment type left to resolution.
    pub fn new(debtor: impl Into<PartyId>, creditor: impl Into<PartyId>, amount: i64) -> Self {
        Self {
            debtor: debtor.into(),
            creditor: creditor.into(),
            amount,
            payment_type: None,
        }
    }

    /// Request a specific payment type.
    pub fn with_payment_type(mut self, payment_type: impl Into<PaymentType>) -> Self {
        self.payment_type = Some(payment_type.into());
        self
    }

    /// Check whether debtor and creditor are the same party.
    pub fn is_self_referential(&self) -> bool {
        self.debtor == self.creditor
    }
}

/// A payment emitted by settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Party sending money.
    pub payer: PartyId,
    /// Party receiving money.
    pub payee: PartyId,
    /// Amount. Always positive.
    pub amount: i64,
    /// Payment type shared by payer and payee, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
}

impl Transfer {
    /// Create a new transfer without a payment type.
    pub fn new(payer: PartyId, payee: PartyId, amount: i64) -> Self {
        Self {
            payer,
            payee,
            amount,
            payment_type: None,
        }
    }

    /// Positive amount between two distinct parties.
    pub fn is_well_formed(&self) -> bool {
        self.amount > 0 && self.payer != self.payee
    }
}
