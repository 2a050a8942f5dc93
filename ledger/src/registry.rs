//! Party registry.
//!
//! Parties keep their registration index for the whole run. That index is
//! what tie-breaks and report ordering are keyed on.

use std::collections::HashMap;

use tracing::debug;

use netsettle_common::{NetSettleError, Party, PartyId, PaymentType, RawTransaction, Result};

use crate::config::LedgerConfig;

/// Ordered set of parties taking part in one settlement run.
#[derive(Debug, Clone, Default)]
pub struct PartyRegistry {
    parties: Vec<Party>,
    index: HashMap<PartyId, usize>,
    max_parties: Option<usize>,
    max_name_len: Option<usize>,
}

impl PartyRegistry {
    /// Create an empty registry with the limits from `config`.
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            parties: Vec::new(),
            index: HashMap::new(),
            max_parties: config.max_parties,
            max_name_len: config.max_name_len,
        }
    }

    /// Build a registry from parties in order.
    pub fn from_parties(
        parties: impl IntoIterator<Item = Party>,
        config: &LedgerConfig,
    ) -> Result<Self> {
        let mut registry = Self::new(config);
        for party in parties {
            registry.register(party)?;
        }
        Ok(registry)
    }

    /// Register a party and return its index.
    pub fn register(&mut self, party: Party) -> Result<usize> {
        if !party.id.is_valid() {
            return Err(NetSettleError::InvalidParty {
                name: party.id,
                reason: "name must be non-empty and contain no whitespace".to_string(),
            });
        }

        if let Some(limit) = self.max_name_len {
            if party.id.char_len() > limit {
                return Err(NetSettleError::InvalidParty {
                    name: party.id,
                    reason: format!("name longer than {} characters", limit),
                });
            }
        }

        if self.index.contains_key(&party.id) {
            return Err(NetSettleError::DuplicateParty(party.id));
        }

        if let Some(limit) = self.max_parties {
            if self.parties.len() >= limit {
                return Err(NetSettleError::CapacityExceeded { limit });
            }
        }

        let idx = self.parties.len();
        debug!(party = %party.id, index = idx, "Party registered");
        self.index.insert(party.id.clone(), idx);
        self.parties.push(party);
        Ok(idx)
    }

    /// Registration index of a party.
    pub fn index_of(&self, id: &PartyId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Registration index of a party, or `UnknownParty`.
    pub fn resolve(&self, id: &PartyId) -> Result<usize> {
        self.index_of(id)
            .ok_or_else(|| NetSettleError::UnknownParty(id.clone()))
    }

    /// Look up a party by name.
    pub fn get(&self, id: &PartyId) -> Option<&Party> {
        self.index_of(id).map(|idx| &self.parties[idx])
    }

    /// Party at a registration index.
    pub fn party_at(&self, idx: usize) -> Option<&Party> {
        self.parties.get(idx)
    }

    /// Number of registered parties.
    pub fn len(&self) -> usize {
        self.parties.len()
    }

    /// Check if no party is registered.
    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    /// Party names in registration order.
    pub fn ids(&self) -> Vec<PartyId> {
        self.parties.iter().map(|p| p.id.clone()).collect()
    }

    /// Resolve the payment type a transaction settles in.
    ///
    /// A requested type must be supported by both sides. Without a request the
    /// first type in the debtor's declared order that the creditor accepts wins.
    pub fn resolve_payment_type(&self, tx: &RawTransaction) -> Result<PaymentType> {
        let debtor = self
            .get(&tx.debtor)
            .ok_or_else(|| NetSettleError::UnknownParty(tx.debtor.clone()))?;
        let creditor = self
            .get(&tx.creditor)
            .ok_or_else(|| NetSettleError::UnknownParty(tx.creditor.clone()))?;

        let resolved = match &tx.payment_type {
            Some(requested) if debtor.supports(requested) && creditor.supports(requested) => {
                Some(requested.clone())
            }
            Some(_) => None,
            None => debtor.common_type(creditor).cloned(),
        };

        resolved.ok_or_else(|| NetSettleError::TypeMismatch {
            debtor: tx.debtor.clone(),
            creditor: tx.creditor.clone(),
            requested: tx.payment_type.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party(name: &str, types: &[&str]) -> Party {
        Party::new(name, types.iter().map(|t| PaymentType::from(*t)).collect())
    }

    fn registry() -> PartyRegistry {
        PartyRegistry::from_parties(
            vec![
                party("A", &["UPI", "NEFT"]),
                party("B", &["NEFT", "UPI"]),
                party("C", &["RTGS"]),
            ],
            &LedgerConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_registration_order() {
        assert!(PartyRegistry::new(&LedgerConfig::default()).is_empty());

        let registry = registry();
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
        assert_eq!(registry.index_of(&PartyId::new("A")), Some(0));
        assert_eq!(registry.index_of(&PartyId::new("C")), Some(2));
        assert_eq!(registry.party_at(1).unwrap().id, PartyId::new("B"));
    }

    #[test]
    fn test_duplicate_party_rejected() {
        let mut registry = registry();
        let err = registry.register(party("B", &["UPI"])).unwrap_err();
        assert_eq!(err, NetSettleError::DuplicateParty(PartyId::new("B")));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_capacity_limit() {
        let config = LedgerConfig {
            max_parties: Some(2),
            ..LedgerConfig::default()
        };
        let result = PartyRegistry::from_parties(
            vec![party("A", &[]), party("B", &[]), party("C", &[])],
            &config,
        );
        assert_eq!(result.unwrap_err(), NetSettleError::CapacityExceeded { limit: 2 });
    }

    #[test]
    fn test_name_validation() {
        let mut registry = PartyRegistry::new(&LedgerConfig::default());
        assert!(matches!(
            registry.register(party("", &[])),
            Err(NetSettleError::InvalidParty { .. })
        ));

        let long_name = "X".repeat(51);
        assert!(matches!(
            registry.register(party(&long_name, &[])),
            Err(NetSettleError::InvalidParty { .. })
        ));

        let unbounded = LedgerConfig {
            max_name_len: None,
            ..LedgerConfig::default()
        };
        let mut registry = PartyRegistry::new(&unbounded);
        assert!(registry.register(party(&long_name, &[])).is_ok());
    }

    #[test]
    fn test_resolve_payment_type() {
        let registry = registry();

        let tx = RawTransaction::new("A", "B", 10);
        assert_eq!(registry.resolve_payment_type(&tx).unwrap(), PaymentType::from("UPI"));

        let tx = RawTransaction::new("B", "A", 10);
        assert_eq!(registry.resolve_payment_type(&tx).unwrap(), PaymentType::from("NEFT"));

        let tx = RawTransaction::new("B", "A", 10).with_payment_type("UPI");
        assert_eq!(registry.resolve_payment_type(&tx).unwrap(), PaymentType::from("UPI"));
    }

    #[test]
    fn test_resolve_payment_type_mismatch() {
        let registry = registry();

        let tx = RawTransaction::new("A", "C", 10);
        assert!(matches!(
            registry.resolve_payment_type(&tx),
            Err(NetSettleError::TypeMismatch { requested: None, .. })
        ));

        let tx = RawTransaction::new("A", "B", 10).with_payment_type("RTGS");
        assert!(matches!(
            registry.resolve_payment_type(&tx),
            Err(NetSettleError::TypeMismatch { requested: Some(_), .. })
        ));
    }

    #[test]
    fn test_unknown_party() {
        let registry = registry();
        let tx = RawTransaction::new("A", "Z", 10);
        assert_eq!(
            registry.resolve_payment_type(&tx).unwrap_err(),
            NetSettleError::UnknownParty(PartyId::new("Z"))
        );
    }
}
