//! Random ledgers for the `simulate` command.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

use netsettle_common::{Party, PaymentType, RawTransaction};

use crate::scenario::Scenario;

/// Every generated bank accepts this type, so any pair can transact.
const SHARED_TYPE: &str = "NEFT";

const EXTRA_TYPES: [&str; 3] = ["UPI", "RTGS", "IMPS"];

/// Bank factory for generated ledgers.
pub struct BankFactory;

impl BankFactory {
    /// Create N bank names.
    pub fn bank_names(count: usize) -> Vec<String> {
        let bank_names = [
            "BANK_A", "BANK_B", "BANK_C", "BANK_D", "BANK_E", "BANK_F", "BANK_G", "BANK_H",
            "BANK_I", "BANK_J",
        ];

        (0..count)
            .map(|i| match bank_names.get(i) {
                Some(name) => name.to_string(),
                // Generate names for banks beyond the predefined list
                None => format!("BANK_{}", i + 1),
            })
            .collect()
    }
}

/// Seedable generator of random IOU ledgers.
pub struct LedgerGenerator {
    rng: StdRng,
    max_amount: i64,
}

impl LedgerGenerator {
    /// Create a generator. The same seed always yields the same ledger.
    pub fn new(seed: Option<u64>, max_amount: i64) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            max_amount: max_amount.max(1),
        }
    }

    /// Generate `parties` banks and `transactions` IOUs between distinct banks.
    pub fn generate(&mut self, parties: usize, transactions: usize) -> anyhow::Result<Scenario> {
        if parties < 2 {
            anyhow::bail!(
                "at least 2 parties are needed to generate transactions, got {}",
                parties
            );
        }

        let names = BankFactory::bank_names(parties);
        let banks: Vec<Party> = names
            .iter()
            .map(|name| Party::new(name.as_str(), self.payment_types()))
            .collect();

        let mut txs = Vec::with_capacity(transactions);
        for _ in 0..transactions {
            let debtor = self.rng.gen_range(0..parties);
            let mut creditor = self.rng.gen_range(0..parties);
            while creditor == debtor {
                creditor = self.rng.gen_range(0..parties);
            }
            let amount = self.rng.gen_range(1..=self.max_amount);

            txs.push(RawTransaction::new(
                names[debtor].as_str(),
                names[creditor].as_str(),
                amount,
            ));
        }

        info!(parties, transactions, "Generated random ledger");

        Ok(Scenario {
            name: "simulated".to_string(),
            description: format!("{} random IOUs between {} banks", transactions, parties),
            parties: banks,
            transactions: txs,
        })
    }

    fn payment_types(&mut self) -> Vec<PaymentType> {
        let extras = self.rng.gen_range(0..=EXTRA_TYPES.len());
        let mut types = vec![PaymentType::new(SHARED_TYPE)];
        types.extend(
            EXTRA_TYPES
                .choose_multiple(&mut self.rng, extras)
                .map(|t| PaymentType::new(*t)),
        );
        types
    }
}
