//! Settlement plans: the engine's transfers shaped for reporting.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use netsettle_common::{NetSettleError, PartyId, Result, RunId, Transfer};
use netsettle_ledger::{AggregationStats, NetBalances, PartyRegistry};

/// Summary counters for a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStats {
    /// Raw transactions folded into the ledger.
    pub input_transactions: usize,
    /// Sum of raw transaction amounts.
    pub gross_volume: i128,
    /// Transfers in the plan.
    pub transfers: usize,
    /// Sum of transfer amounts.
    pub settled_volume: i128,
    /// Payments avoided compared to paying every IOU individually.
    pub payments_saved: usize,
}

/// Transfers sent by one payer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayerGroup<'a> {
    /// The paying party.
    pub payer: &'a PartyId,
    /// Its transfers in emission order.
    pub transfers: Vec<&'a Transfer>,
}

/// Ordered transfers that clear every net position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Run that produced this plan.
    pub run_id: RunId,
    /// When the plan was produced.
    pub created_at: DateTime<Utc>,
    /// Transfers in emission order.
    transfers: Vec<Transfer>,
    /// Summary counters.
    pub stats: PlanStats,
    /// Registration order, for payer grouping.
    #[serde(skip)]
    party_order: Vec<PartyId>,
}

impl SettlementPlan {
    /// Wrap engine output.
    pub fn new(
        run_id: RunId,
        transfers: Vec<Transfer>,
        party_order: Vec<PartyId>,
        aggregation: &AggregationStats,
    ) -> Self {
        let settled_volume = transfers.iter().map(|t| t.amount as i128).sum();
        let stats = PlanStats {
            input_transactions: aggregation.applied,
            gross_volume: aggregation.gross_volume,
            transfers: transfers.len(),
            settled_volume,
            payments_saved: aggregation.applied.saturating_sub(transfers.len()),
        };

        Self {
            run_id,
            created_at: Utc::now(),
            transfers,
            stats,
            party_order,
        }
    }

    /// Transfers in emission order.
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// True when nothing has to move ("no transactions needed").
    pub fn is_noop(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Group transfers by payer.
    ///
    /// Payers appear in registration order; any payer missing from that order
    /// follows in order of first emission.
    pub fn by_payer(&self) -> Vec<PayerGroup<'_>> {
        let rank: HashMap<&PartyId, usize> = self
            .party_order
            .iter()
            .enumerate()
            .map(|(idx, id)| (id, idx))
            .collect();

        let mut groups: Vec<PayerGroup<'_>> = Vec::new();
        for transfer in &self.transfers {
            match groups.iter_mut().find(|g| g.payer == &transfer.payer) {
                Some(group) => group.transfers.push(transfer),
                None => groups.push(PayerGroup {
                    payer: &transfer.payer,
                    transfers: vec![transfer],
                }),
            }
        }

        // Stable sort keeps first-emission order among unranked payers.
        groups.sort_by_key(|g| rank.get(g.payer).copied().unwrap_or(usize::MAX));
        groups
    }

    /// Tag each transfer with the first payment type in the payer's declared
    /// order that the payee also accepts. Pairs with nothing in common stay
    /// untagged.
    pub fn annotate_payment_types(&mut self, registry: &PartyRegistry) {
        for transfer in &mut self.transfers {
            let payer = registry.get(&transfer.payer);
            let payee = registry.get(&transfer.payee);
            transfer.payment_type = match (payer, payee) {
                (Some(payer), Some(payee)) => payer.common_type(payee).cloned(),
                _ => None,
            };
        }
    }

    /// Check that the transfers reproduce every original net position and
    /// are all well formed.
    pub fn verify_against(&self, original: &NetBalances) -> Result<()> {
        let mut net: HashMap<&PartyId, i128> = HashMap::new();
        for transfer in &self.transfers {
            if !transfer.is_well_formed() {
                return Err(NetSettleError::InvalidTransaction {
                    debtor: transfer.payer.clone(),
                    creditor: transfer.payee.clone(),
                    amount: transfer.amount,
                    reason: "settlement emitted a malformed transfer".to_string(),
                });
            }
            *net.entry(&transfer.payee).or_insert(0) += transfer.amount as i128;
            *net.entry(&transfer.payer).or_insert(0) -= transfer.amount as i128;
        }

        for (party, expected) in original.iter() {
            let actual = net.remove(party).unwrap_or(0);
            if actual != expected as i128 {
                return Err(NetSettleError::ConservationViolated {
                    party: party.clone(),
                    expected,
                    actual,
                });
            }
        }

        match net.into_iter().next() {
            Some((party, actual)) => Err(NetSettleError::ConservationViolated {
                party: party.clone(),
                expected: 0,
                actual,
            }),
            None => Ok(()),
        }
    }
}
