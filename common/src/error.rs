//! Error types for the netsettle pipeline.

use crate::{PartyId, PaymentType, RunStatus};
use thiserror::Error;

/// Main error type for netsettle operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetSettleError {
    /// Self-referential record or non-positive amount.
    #[error("Invalid transaction {debtor} -> {creditor} ({amount}): {reason}")]
    InvalidTransaction {
        debtor: PartyId,
        creditor: PartyId,
        amount: i64,
        reason: String,
    },

    /// Debtor and creditor share no usable payment type.
    #[error(
        "No common payment type between {debtor} and {creditor}{}",
        requested_suffix(.requested)
    )]
    TypeMismatch {
        debtor: PartyId,
        creditor: PartyId,
        requested: Option<PaymentType>,
    },

    /// Net balances do not sum to zero.
    #[error("Imbalanced ledger: balances sum to {residual}")]
    ImbalancedLedger { residual: i128 },

    /// Transfers do not reproduce a party's original net position.
    #[error("Conservation violated for {party}: expected net {expected}, transfers give {actual}")]
    ConservationViolated {
        party: PartyId,
        expected: i64,
        actual: i128,
    },

    /// Party not present in the registry.
    #[error("Unknown party: {0}")]
    UnknownParty(PartyId),

    /// Party registered twice.
    #[error("Duplicate party: {0}")]
    DuplicateParty(PartyId),

    /// Party name rejected at registration.
    #[error("Invalid party {name}: {reason}")]
    InvalidParty { name: PartyId, reason: String },

    /// Configured party limit reached.
    #[error("Capacity exceeded: at most {limit} parties allowed")]
    CapacityExceeded { limit: usize },

    /// Balance index outside the ledger.
    #[error("Party index {index} out of range for {parties} parties")]
    PartyIndexOutOfRange { index: usize, parties: usize },

    /// Checked arithmetic failed.
    #[error("Amount overflow while updating {party}")]
    AmountOverflow { party: PartyId },

    /// Invalid run state transition.
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: RunStatus, to: RunStatus },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

fn requested_suffix(requested: &Option<PaymentType>) -> String {
    match requested {
        Some(t) => format!(" (requested {})", t),
        None => String::new(),
    }
}

impl NetSettleError {
    /// Record-level rejections a caller may skip instead of aborting the batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            NetSettleError::InvalidTransaction { .. }
                | NetSettleError::TypeMismatch { .. }
                | NetSettleError::UnknownParty(_)
        )
    }

    /// Get a stable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetSettleError::InvalidTransaction { .. } => "INVALID_TRANSACTION",
            NetSettleError::TypeMismatch { .. } => "TYPE_MISMATCH",
            NetSettleError::ImbalancedLedger { .. } => "IMBALANCED_LEDGER",
            NetSettleError::ConservationViolated { .. } => "CONSERVATION_VIOLATED",
            NetSettleError::UnknownParty(_) => "UNKNOWN_PARTY",
            NetSettleError::DuplicateParty(_) => "DUPLICATE_PARTY",
            NetSettleError::InvalidParty { .. } => "INVALID_PARTY",
            NetSettleError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            NetSettleError::PartyIndexOutOfRange { .. } => "PARTY_INDEX_OUT_OF_RANGE",
            NetSettleError::AmountOverflow { .. } => "AMOUNT_OVERFLOW",
            NetSettleError::InvalidTransition { .. } => "INVALID_TRANSITION",
            NetSettleError::ConfigurationError(_) => "CONFIGURATION_ERROR",
        }
    }
}

/// Result type alias for netsettle operations.
pub type Result<T> = std::result::Result<T, NetSettleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message() {
        let err = NetSettleError::TypeMismatch {
            debtor: PartyId::new("A"),
            creditor: PartyId::new("B"),
            requested: None,
        };
        assert_eq!(err.to_string(), "No common payment type between A and B");

        let err = NetSettleError::TypeMismatch {
            debtor: PartyId::new("A"),
            creditor: PartyId::new("B"),
            requested: Some(PaymentType::new("UPI")),
        };
        assert_eq!(
            err.to_string(),
            "No common payment type between A and B (requested UPI)"
        );
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(NetSettleError::UnknownParty(PartyId::new("X")).is_recoverable());
        assert!(!NetSettleError::ImbalancedLedger { residual: 5 }.is_recoverable());
        assert!(!NetSettleError::AmountOverflow {
            party: PartyId::new("A")
        }
        .is_recoverable());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            NetSettleError::ImbalancedLedger { residual: -1 }.error_code(),
            "IMBALANCED_LEDGER"
        );
        assert_eq!(
            NetSettleError::CapacityExceeded { limit: 100 }.error_code(),
            "CAPACITY_EXCEEDED"
        );
        let out_of_range = NetSettleError::PartyIndexOutOfRange { index: 4, parties: 2 };
        assert_eq!(out_of_range.error_code(), "PARTY_INDEX_OUT_OF_RANGE");
        assert!(!out_of_range.is_recoverable());
    }
}
