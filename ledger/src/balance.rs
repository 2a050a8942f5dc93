//! Per-party net balances.

use std::collections::HashSet;

use netsettle_common::{NetSettleError, PartyId, Result};
use serde::{Deserialize, Serialize};

use crate::registry::PartyRegistry;

/// Net position of every party, in registration order.
///
/// Positive means the party is owed money, negative means it owes. The
/// settlement engine takes a working copy by value and drives every entry
/// to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BalanceColumns")]
pub struct NetBalances {
    parties: Vec<PartyId>,
    balances: Vec<i64>,
}

/// Unchecked wire form of [`NetBalances`].
#[derive(Deserialize)]
struct BalanceColumns {
    parties: Vec<PartyId>,
    balances: Vec<i64>,
}

impl TryFrom<BalanceColumns> for NetBalances {
    type Error = NetSettleError;

    fn try_from(columns: BalanceColumns) -> Result<Self> {
        if columns.parties.len() != columns.balances.len() {
            return Err(NetSettleError::ConfigurationError(format!(
                "{} parties but {} balances",
                columns.parties.len(),
                columns.balances.len()
            )));
        }
        Self::from_entries(columns.parties.into_iter().zip(columns.balances))
    }
}

impl NetBalances {
    /// All registered parties at zero.
    pub fn zeroed(registry: &PartyRegistry) -> Self {
        let parties = registry.ids();
        let balances = vec![0; parties.len()];
        Self { parties, balances }
    }

    /// Build balances directly, e.g. for engine fixtures.
    pub fn from_entries<I, P>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, i64)>,
        P: Into<PartyId>,
    {
        let mut seen = HashSet::new();
        let mut parties = Vec::new();
        let mut balances = Vec::new();

        for (party, balance) in entries {
            let party = party.into();
            if !seen.insert(party.clone()) {
                return Err(NetSettleError::DuplicateParty(party));
            }
            parties.push(party);
            balances.push(balance);
        }

        Ok(Self { parties, balances })
    }

    /// Number of parties.
    pub fn len(&self) -> usize {
        self.parties.len()
    }

    /// Check if there are no parties.
    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    /// Balance of a party by name.
    pub fn get(&self, party: &PartyId) -> Option<i64> {
        self.position(party)
            .and_then(|idx| self.balances.get(idx).copied())
    }

    /// Balance at a registration index.
    pub fn balance_at(&self, idx: usize) -> Option<i64> {
        self.balances.get(idx).copied()
    }

    /// Party at a registration index.
    pub fn party_at(&self, idx: usize) -> Option<&PartyId> {
        self.parties.get(idx)
    }

    /// Registration index of a party.
    pub fn position(&self, party: &PartyId) -> Option<usize> {
        self.parties.iter().position(|p| p == party)
    }

    /// `(party, balance)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&PartyId, i64)> {
        self.parties.iter().zip(self.balances.iter().copied())
    }

    /// Sum of all balances. Widened so the check itself cannot overflow.
    pub fn sum(&self) -> i128 {
        self.balances.iter().map(|&b| b as i128).sum()
    }

    /// Check the zero-sum invariant.
    pub fn is_balanced(&self) -> bool {
        self.sum() == 0
    }

    /// Fail with `ImbalancedLedger` unless the balances sum to zero.
    pub fn verify_zero_sum(&self) -> Result<()> {
        match self.sum() {
            0 => Ok(()),
            residual => Err(NetSettleError::ImbalancedLedger { residual }),
        }
    }

    /// Check if every party is flat.
    pub fn all_zero(&self) -> bool {
        self.balances.iter().all(|&b| b == 0)
    }

    /// Number of parties with a non-zero position.
    pub fn nonzero_count(&self) -> usize {
        self.balances.iter().filter(|&&b| b != 0).count()
    }

    /// Party with the strictly largest positive balance.
    /// Ties go to the lowest index.
    pub fn max_creditor(&self) -> Option<(usize, i64)> {
        let mut best: Option<(usize, i64)> = None;
        for (idx, &balance) in self.balances.iter().enumerate() {
            if balance > best.map_or(0, |(_, b)| b) {
                best = Some((idx, balance));
            }
        }
        best
    }

    /// Party with the strictly smallest negative balance.
    /// Ties go to the lowest index.
    pub fn max_debtor(&self) -> Option<(usize, i64)> {
        let mut best: Option<(usize, i64)> = None;
        for (idx, &balance) in self.balances.iter().enumerate() {
            if balance < best.map_or(0, |(_, b)| b) {
                best = Some((idx, balance));
            }
        }
        best
    }

    /// Move `amount` of net position from payee to payer: the payer's debt
    /// shrinks and the payee's claim shrinks by the same amount.
    pub fn apply_transfer(&mut self, payer: usize, payee: usize, amount: i64) -> Result<()> {
        let payee_id = self.party_checked(payee)?;
        let released = amount
            .checked_neg()
            .ok_or_else(|| NetSettleError::AmountOverflow {
                party: payee_id.clone(),
            })?;
        let new_payer = self.checked_adjust(payer, amount)?;
        let new_payee = self.checked_adjust(payee, released)?;
        self.set(payer, new_payer);
        self.set(payee, new_payee);
        Ok(())
    }

    fn party_checked(&self, idx: usize) -> Result<&PartyId> {
        self.parties
            .get(idx)
            .ok_or(NetSettleError::PartyIndexOutOfRange {
                index: idx,
                parties: self.parties.len(),
            })
    }

    /// Value of `balances[idx] + delta`, checked, without mutating.
    pub(crate) fn checked_adjust(&self, idx: usize, delta: i64) -> Result<i64> {
        let party = self.party_checked(idx)?;
        self.balances
            .get(idx)
            .and_then(|balance| balance.checked_add(delta))
            .ok_or_else(|| NetSettleError::AmountOverflow {
                party: party.clone(),
            })
    }

    /// Overwrite a balance computed with
    /// [`checked_adjust`](Self::checked_adjust). Out-of-range indices are
    /// ignored; `checked_adjust` has already rejected them.
    pub(crate) fn set(&mut self, idx: usize, balance: i64) {
        if let Some(slot) = self.balances.get_mut(idx) {
            *slot = balance;
        }
    }
}
