//! One pass of the pipeline: aggregate, settle, shape.

use tracing::{info, instrument, warn};

use netsettle_common::{NetSettleError, RawTransaction, Result, RunId, RunStatus};
use netsettle_ledger::{
    aggregate, LedgerConfig, NetBalances, PairLedger, PartyRegistry, RejectedRecord,
};

use crate::engine::SettlementEngine;
use crate::plan::SettlementPlan;

/// Everything a reporter needs from a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The settlement plan.
    pub plan: SettlementPlan,
    /// Net balances before settlement.
    pub balances: NetBalances,
    /// Aggregated pair ledgers.
    pub pairs: Vec<PairLedger>,
    /// Records skipped during aggregation.
    pub rejected: Vec<RejectedRecord>,
}

/// Drives a single settlement run through its lifecycle.
pub struct SettlementRun<'a> {
    id: RunId,
    registry: &'a PartyRegistry,
    config: LedgerConfig,
    engine: SettlementEngine,
    status: RunStatus,
}

impl<'a> SettlementRun<'a> {
    /// Create a pending run over `registry`.
    pub fn new(registry: &'a PartyRegistry, config: LedgerConfig) -> Self {
        Self {
            id: RunId::new(),
            registry,
            config,
            engine: SettlementEngine::new(),
            status: RunStatus::Pending,
        }
    }

    /// Run identifier.
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Current status.
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn transition_to(&mut self, next: RunStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(NetSettleError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        info!(run_id = %self.id, from = %self.status, to = %next, "Run status changed");
        self.status = next;
        Ok(())
    }

    /// Aggregate `transactions`, settle the balances and shape the plan.
    ///
    /// Any error marks the run failed.
    #[instrument(skip_all, fields(run_id = %self.id))]
    pub fn execute(&mut self, transactions: &[RawTransaction]) -> Result<RunReport> {
        match self.execute_inner(transactions) {
            Ok(report) => Ok(report),
            Err(error) => {
                warn!(code = error.error_code(), error = %error, "Run failed");
                if self.status.can_transition_to(RunStatus::Failed) {
                    self.transition_to(RunStatus::Failed)?;
                }
                Err(error)
            }
        }
    }

    fn execute_inner(&mut self, transactions: &[RawTransaction]) -> Result<RunReport> {
        let aggregation = aggregate(self.registry, transactions, &self.config)?;
        self.transition_to(RunStatus::Aggregated)?;

        self.transition_to(RunStatus::Settling)?;
        let transfers = self.engine.settle(aggregation.balances.clone())?;

        let mut plan = SettlementPlan::new(
            self.id,
            transfers,
            self.registry.ids(),
            &aggregation.stats,
        );
        plan.verify_against(&aggregation.balances)?;
        plan.annotate_payment_types(self.registry);

        self.transition_to(RunStatus::Settled)?;

        info!(
            transfers = plan.stats.transfers,
            payments_saved = plan.stats.payments_saved,
            "Run settled"
        );

        Ok(RunReport {
            plan,
            balances: aggregation.balances,
            pairs: aggregation.pairs,
            rejected: aggregation.rejected,
        })
    }
}
