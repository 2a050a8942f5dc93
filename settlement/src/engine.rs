//! Greedy extreme-matching settlement.

use tracing::{debug, error, info, instrument};

use netsettle_common::{NetSettleError, Result, Transfer};
use netsettle_ledger::NetBalances;

/// Settles net balances by repeatedly paying the largest creditor out of the
/// largest debtor.
///
/// Each step zeroes at least one party, so a ledger with `P` parties needs
/// at most `P - 1` transfers. Ties pick the lowest registration index.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementEngine;

impl SettlementEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Settle a working copy of the balances.
    pub fn settle(&self, mut balances: NetBalances) -> Result<Vec<Transfer>> {
        self.settle_in_place(&mut balances)
    }

    /// Settle `balances` in place, leaving every entry at zero.
    #[instrument(skip_all, fields(parties = balances.len()))]
    pub fn settle_in_place(&self, balances: &mut NetBalances) -> Result<Vec<Transfer>> {
        balances.verify_zero_sum()?;

        if balances.all_zero() {
            info!("No transactions needed");
            return Ok(Vec::new());
        }

        let max_steps = balances.len().saturating_sub(1);
        let mut transfers = Vec::with_capacity(max_steps);

        while !balances.all_zero() {
            if transfers.len() >= max_steps {
                // Only reachable if the zero-sum check above was bypassed.
                error!(steps = transfers.len(), "Settlement exceeded step bound");
                return Err(imbalance(balances));
            }

            let (creditor, credit) = balances.max_creditor().ok_or_else(|| imbalance(balances))?;
            let (debtor, debt) = balances.max_debtor().ok_or_else(|| imbalance(balances))?;
            let payer = balances.party_at(debtor).cloned().ok_or_else(|| imbalance(balances))?;
            let payee = balances.party_at(creditor).cloned().ok_or_else(|| imbalance(balances))?;

            let amount = debt.checked_neg().map_or(credit, |owed| credit.min(owed));
            balances.apply_transfer(debtor, creditor, amount)?;

            debug!(
                step = transfers.len() + 1,
                payer = %payer,
                payee = %payee,
                amount,
                "Matched extremes"
            );

            transfers.push(Transfer::new(payer, payee, amount));
        }

        balances.verify_zero_sum()?;

        info!(transfers = transfers.len(), "Balances settled");

        Ok(transfers)
    }
}

fn imbalance(balances: &NetBalances) -> NetSettleError {
    NetSettleError::ImbalancedLedger {
        residual: balances.sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netsettle_common::PartyId;

    fn balances(entries: &[(&str, i64)]) -> NetBalances {
        NetBalances::from_entries(entries.iter().copied()).unwrap()
    }

    fn transfer(payer: &str, payee: &str, amount: i64) -> Transfer {
        Transfer::new(PartyId::new(payer), PartyId::new(payee), amount)
    }

    #[test]
    fn test_triangle_settlement() {
        let engine = SettlementEngine::new();
        let transfers = engine
            .settle(balances(&[("A", -100), ("B", -100), ("C", 200)]))
            .unwrap();

        assert_eq!(
            transfers,
            vec![transfer("A", "C", 100), transfer("B", "C", 100)]
        );
    }

    #[test]
    fn test_all_zero_needs_no_transfers() {
        let engine = SettlementEngine::new();
        let transfers = engine
            .settle(balances(&[("A", 0), ("B", 0), ("C", 0)]))
            .unwrap();
        assert!(transfers.is_empty());
    }

    #[test]
    fn test_empty_ledger() {
        let engine = SettlementEngine::new();
        let transfers = engine.settle(balances(&[])).unwrap();
        assert!(transfers.is_empty());
    }

    #[test]
    fn test_second_run_is_noop() {
        let engine = SettlementEngine::new();
        let mut working = balances(&[("A", 50), ("B", -20), ("C", -30), ("D", 0)]);

        let first = engine.settle_in_place(&mut working).unwrap();
        assert_eq!(first.len(), 2);
        assert!(working.all_zero());

        let second = engine.settle_in_place(&mut working).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn test_extremes_rederived_each_step() {
        // D stays the only creditor while debtors are taken largest first.
        let engine = SettlementEngine::new();
        let transfers = engine
            .settle(balances(&[
                ("A", -70),
                ("B", -20),
                ("C", -10),
                ("D", 100),
                ("E", 0),
            ]))
            .unwrap();

        assert_eq!(
            transfers,
            vec![
                transfer("A", "D", 70),
                transfer("B", "D", 20),
                transfer("C", "D", 10),
            ]
        );
    }

    #[test]
    fn test_partial_matches() {
        let engine = SettlementEngine::new();
        let transfers = engine
            .settle(balances(&[("A", 60), ("B", 40), ("C", -30), ("D", -70)]))
            .unwrap();

        assert_eq!(
            transfers,
            vec![
                transfer("D", "A", 60),
                transfer("C", "B", 30),
                transfer("D", "B", 10),
            ]
        );
    }

    #[test]
    fn test_imbalanced_ledger_rejected() {
        let engine = SettlementEngine::new();
        let err = engine
            .settle(balances(&[("A", 100), ("B", -60)]))
            .unwrap_err();
        assert_eq!(err, NetSettleError::ImbalancedLedger { residual: 40 });
    }

    #[test]
    fn test_extreme_values() {
        let engine = SettlementEngine::new();
        let transfers = engine
            .settle(balances(&[("A", i64::MAX), ("B", -i64::MAX)]))
            .unwrap();
        assert_eq!(transfers, vec![transfer("B", "A", i64::MAX)]);
    }
}
