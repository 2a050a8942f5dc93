//! Folds raw transactions into pair ledgers and net balances.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use netsettle_common::{NetSettleError, RawTransaction, Result};

use crate::balance::NetBalances;
use crate::config::{InvalidRecordPolicy, LedgerConfig};
use crate::pair::PairLedger;
use crate::registry::PartyRegistry;

/// A transaction the aggregator refused, with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Zero-based index in the input batch.
    pub index: usize,
    /// The offending record.
    pub transaction: RawTransaction,
    /// Why it was refused.
    pub error: NetSettleError,
}

/// Counters describing what was folded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationStats {
    /// Records applied to the ledger.
    pub applied: usize,
    /// Records rejected under the skip policy.
    pub rejected: usize,
    /// Sum of applied amounts.
    pub gross_volume: i128,
}

/// Output of the aggregator.
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// Net balance of every registered party.
    pub balances: NetBalances,
    /// One entry per directed (debtor, creditor) pair, ordered by registration
    /// index of debtor then creditor.
    pub pairs: Vec<PairLedger>,
    /// Records skipped under [`InvalidRecordPolicy::Skip`].
    pub rejected: Vec<RejectedRecord>,
    /// Counters.
    pub stats: AggregationStats,
}

/// Incremental ledger builder over a fixed party registry.
pub struct LedgerAggregator<'a> {
    registry: &'a PartyRegistry,
    balances: NetBalances,
    pairs: BTreeMap<(usize, usize), PairLedger>,
    stats: AggregationStats,
}

impl<'a> LedgerAggregator<'a> {
    /// Create an aggregator with every registered party at zero.
    pub fn new(registry: &'a PartyRegistry) -> Self {
        Self {
            registry,
            balances: NetBalances::zeroed(registry),
            pairs: BTreeMap::new(),
            stats: AggregationStats::default(),
        }
    }

    /// Validate and fold one transaction.
    ///
    /// All checks run before anything is written, so a rejected record
    /// leaves balances and pair ledgers exactly as they were.
    pub fn record(&mut self, tx: &RawTransaction) -> Result<()> {
        if tx.is_self_referential() {
            return Err(invalid(tx, "debtor and creditor are the same party"));
        }
        if tx.amount <= 0 {
            return Err(invalid(tx, "amount must be positive"));
        }

        let debtor = self.registry.resolve(&tx.debtor)?;
        let creditor = self.registry.resolve(&tx.creditor)?;
        let payment_type = self.registry.resolve_payment_type(tx)?;

        let new_creditor = self.balances.checked_adjust(creditor, tx.amount)?;
        let new_debtor = self.balances.checked_adjust(debtor, -tx.amount)?;
        if let Some(pair) = self.pairs.get(&(debtor, creditor)) {
            pair.checked_total(tx.amount)?;
        }

        self.balances.set(creditor, new_creditor);
        self.balances.set(debtor, new_debtor);
        match self.pairs.get_mut(&(debtor, creditor)) {
            Some(pair) => pair.fold(tx.amount, payment_type)?,
            None => {
                self.pairs.insert(
                    (debtor, creditor),
                    PairLedger::new(
                        tx.debtor.clone(),
                        tx.creditor.clone(),
                        tx.amount,
                        payment_type,
                    ),
                );
            }
        }

        self.stats.applied += 1;
        self.stats.gross_volume += tx.amount as i128;

        debug!(
            debtor = %tx.debtor,
            creditor = %tx.creditor,
            amount = tx.amount,
            "Transaction folded"
        );

        Ok(())
    }

    /// Current balances.
    pub fn balances(&self) -> &NetBalances {
        &self.balances
    }

    /// Finish and hand over the ledger.
    pub fn finish(self) -> Aggregation {
        Aggregation {
            balances: self.balances,
            pairs: self.pairs.into_values().collect(),
            rejected: Vec::new(),
            stats: self.stats,
        }
    }
}

fn invalid(tx: &RawTransaction, reason: &str) -> NetSettleError {
    NetSettleError::InvalidTransaction {
        debtor: tx.debtor.clone(),
        creditor: tx.creditor.clone(),
        amount: tx.amount,
        reason: reason.to_string(),
    }
}

/// Aggregate a batch of transactions.
///
/// Under [`InvalidRecordPolicy::Abort`] the first rejected record fails the
/// batch. Under [`InvalidRecordPolicy::Skip`] recoverable rejections are
/// collected and the rest of the batch is applied; overflow still aborts.
#[instrument(skip_all, fields(parties = registry.len(), transactions = transactions.len()))]
pub fn aggregate(
    registry: &PartyRegistry,
    transactions: &[RawTransaction],
    config: &LedgerConfig,
) -> Result<Aggregation> {
    let mut aggregator = LedgerAggregator::new(registry);
    let mut rejected = Vec::new();

    for (index, tx) in transactions.iter().enumerate() {
        match aggregator.record(tx) {
            Ok(()) => {}
            Err(error)
                if config.on_invalid == InvalidRecordPolicy::Skip && error.is_recoverable() =>
            {
                warn!(
                    index,
                    debtor = %tx.debtor,
                    creditor = %tx.creditor,
                    code = error.error_code(),
                    error = %error,
                    "Skipping rejected transaction"
                );
                rejected.push(RejectedRecord {
                    index,
                    transaction: tx.clone(),
                    error,
                });
            }
            Err(error) => {
                warn!(index, code = error.error_code(), error = %error, "Aggregation aborted");
                return Err(error);
            }
        }
    }

    let mut aggregation = aggregator.finish();
    aggregation.balances.verify_zero_sum()?;
    aggregation.stats.rejected = rejected.len();
    aggregation.rejected = rejected;

    info!(
        applied = aggregation.stats.applied,
        rejected = aggregation.stats.rejected,
        pairs = aggregation.pairs.len(),
        gross_volume = %aggregation.stats.gross_volume,
        "Ledger aggregated"
    );

    Ok(aggregation)
}
