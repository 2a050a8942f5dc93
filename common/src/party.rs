//! Parties and the payment types they accept.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::PartyId;

/// A payment-type label such as `UPI` or `NEFT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentType(String);

impl PaymentType {
    /// Create a new payment type label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Get the label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PaymentType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PaymentType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A participant in settlement with its declared payment types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Unique name.
    #[serde(rename = "name")]
    pub id: PartyId,
    /// Supported payment types in declaration order.
    #[serde(default)]
    pub payment_types: Vec<PaymentType>,
}

impl Party {
    /// Create a new party.
    pub fn new(id: impl Into<PartyId>, payment_types: Vec<PaymentType>) -> Self {
        Self {
            id: id.into(),
            payment_types,
        }
    }

    /// Check whether this party accepts the given type.
    pub fn supports(&self, payment_type: &PaymentType) -> bool {
        self.payment_types.contains(payment_type)
    }

    /// First type in this party's declared order that `other` also supports.
    pub fn common_type(&self, other: &Party) -> Option<&PaymentType> {
        self.payment_types.iter().find(|t| other.supports(t))
    }
}
