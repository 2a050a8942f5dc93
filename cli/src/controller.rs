//! Settlement controller.

use anyhow::Context;
use tracing::{info, instrument, warn};

use netsettle_common::NetSettleError;
use netsettle_ledger::{LedgerConfig, PartyRegistry};
use netsettle_settlement::{RunReport, SettlementRun};

use crate::scenario::Scenario;

/// Turns a loaded scenario into a finished run.
pub struct SettlementController {
    config: LedgerConfig,
}

impl SettlementController {
    /// Create a new controller.
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    /// Register the scenario's parties, check every transaction names a
    /// registered party, then run settlement.
    #[instrument(skip_all, fields(scenario = %scenario.name))]
    pub fn settle(&self, scenario: &Scenario) -> anyhow::Result<RunReport> {
        info!(
            parties = scenario.parties.len(),
            transactions = scenario.transactions.len(),
            "Settling scenario"
        );

        let registry = self.registry(scenario)?;
        if registry.is_empty() {
            warn!("Scenario declares no parties");
        }
        Self::check_names(&registry, scenario)?;

        let mut run = SettlementRun::new(&registry, self.config.clone());
        let run_id = run.id();
        let report = run
            .execute(&scenario.transactions)
            .with_context(|| format!("settlement run {} failed", run_id))?;

        info!(
            run_id = %run_id,
            transfers = report.plan.stats.transfers,
            rejected = report.rejected.len(),
            "Scenario settled"
        );

        Ok(report)
    }

    fn registry(&self, scenario: &Scenario) -> anyhow::Result<PartyRegistry> {
        let mut registry = PartyRegistry::new(&self.config);
        for (idx, party) in scenario.parties.iter().enumerate() {
            registry
                .register(party.clone())
                .with_context(|| format!("cannot register party {} ('{}')", idx + 1, party.id))?;
        }
        Ok(registry)
    }

    /// Unknown names are fatal regardless of the invalid-record policy.
    fn check_names(registry: &PartyRegistry, scenario: &Scenario) -> anyhow::Result<()> {
        for (idx, tx) in scenario.transactions.iter().enumerate() {
            for name in [&tx.debtor, &tx.creditor] {
                if registry.index_of(name).is_none() {
                    return Err(NetSettleError::UnknownParty(name.clone())).with_context(|| {
                        format!("transaction {} names an unregistered party", idx + 1)
                    });
                }
            }
        }
        Ok(())
    }
}
