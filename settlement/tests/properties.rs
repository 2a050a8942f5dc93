//! Property-based tests for settlement invariants
//!
//! These tests check properties that must hold for every valid ledger,
//! not just the hand-picked scenarios in the unit tests.

use std::collections::HashMap;

use netsettle_common::{Party, PartyId, PaymentType, RawTransaction};
use netsettle_ledger::{aggregate, LedgerConfig, NetBalances, PartyRegistry};
use netsettle_settlement::{SettlementEngine, SettlementRun};
use proptest::prelude::*;

fn registry(parties: usize) -> PartyRegistry {
    PartyRegistry::from_parties(
        (0..parties).map(|i| Party::new(format!("BANK_{}", i), vec![PaymentType::new("UPI")])),
        &LedgerConfig::default(),
    )
    .unwrap()
}

/// Up to 10 parties and 40 IOUs between distinct parties.
fn ledger() -> impl Strategy<Value = (usize, Vec<RawTransaction>)> {
    (2usize..10).prop_flat_map(|parties| {
        let tx = (0..parties, 1..parties, 1i64..10_000).prop_map(move |(debtor, offset, amount)| {
            let creditor = (debtor + offset) % parties;
            RawTransaction::new(format!("BANK_{}", debtor), format!("BANK_{}", creditor), amount)
        });
        (Just(parties), prop::collection::vec(tx, 0..40))
    })
}

fn balances_for(parties: usize, transactions: &[RawTransaction]) -> NetBalances {
    let registry = registry(parties);
    aggregate(&registry, transactions, &LedgerConfig::default())
        .unwrap()
        .balances
}

// ============================================================================
// Ledger Invariants
// ============================================================================

proptest! {
    /// Property: aggregated balances always sum to zero
    #[test]
    fn aggregated_balances_sum_to_zero((parties, transactions) in ledger()) {
        let balances = balances_for(parties, &transactions);
        prop_assert_eq!(balances.sum(), 0);
    }

    /// Property: aggregation does not depend on input order
    #[test]
    fn aggregation_is_order_independent((parties, mut transactions) in ledger()) {
        let forward = balances_for(parties, &transactions);
        transactions.reverse();
        let backward = balances_for(parties, &transactions);
        prop_assert_eq!(forward, backward);
    }
}

// ============================================================================
// Settlement Invariants
// ============================================================================

proptest! {
    /// Property: settling leaves every balance at zero
    #[test]
    fn settlement_clears_all_balances((parties, transactions) in ledger()) {
        let mut working = balances_for(parties, &transactions);
        SettlementEngine::new().settle_in_place(&mut working).unwrap();
        prop_assert!(working.all_zero());
        prop_assert_eq!(working.sum(), 0);
    }

    /// Property: transfers <= (parties with non-zero balance) - 1
    #[test]
    fn transfer_count_is_bounded((parties, transactions) in ledger()) {
        let balances = balances_for(parties, &transactions);
        let nonzero = balances.nonzero_count();
        let transfers = SettlementEngine::new().settle(balances).unwrap();
        prop_assert!(transfers.len() <= nonzero.saturating_sub(1));
    }

    /// Property: transfers reproduce every original net position
    #[test]
    fn transfers_conserve_net_positions((parties, transactions) in ledger()) {
        let balances = balances_for(parties, &transactions);
        let transfers = SettlementEngine::new().settle(balances.clone()).unwrap();

        let mut net: HashMap<PartyId, i64> = HashMap::new();
        for t in &transfers {
            *net.entry(t.payee.clone()).or_insert(0) += t.amount;
            *net.entry(t.payer.clone()).or_insert(0) -= t.amount;
        }

        for (party, expected) in balances.iter() {
            prop_assert_eq!(net.get(party).copied().unwrap_or(0), expected);
        }
    }

    /// Property: every transfer is positive and between distinct parties
    #[test]
    fn transfers_are_positive((parties, transactions) in ledger()) {
        let balances = balances_for(parties, &transactions);
        for t in SettlementEngine::new().settle(balances).unwrap() {
            prop_assert!(t.amount > 0);
            prop_assert_ne!(t.payer, t.payee);
        }
    }

    /// Property: settling an already settled ledger is a no-op
    #[test]
    fn settlement_is_idempotent((parties, transactions) in ledger()) {
        let engine = SettlementEngine::new();
        let mut working = balances_for(parties, &transactions);
        engine.settle_in_place(&mut working).unwrap();
        prop_assert!(engine.settle_in_place(&mut working).unwrap().is_empty());
    }

    /// Property: the same input always yields the same plan
    #[test]
    fn settlement_is_deterministic((parties, transactions) in ledger()) {
        let registry = registry(parties);
        let first = SettlementRun::new(&registry, LedgerConfig::default())
            .execute(&transactions)
            .unwrap();
        let second = SettlementRun::new(&registry, LedgerConfig::default())
            .execute(&transactions)
            .unwrap();
        prop_assert_eq!(first.plan.transfers(), second.plan.transfers());
    }
}
