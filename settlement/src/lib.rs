//! NetSettle Settlement Engine
//!
//! Turns per-party net balances into a short list of payer-to-payee
//! transfers by repeatedly matching the largest creditor against the
//! largest debtor.
//!
//! # Example
//!
//! ```rust
//! use netsettle_common::{Party, PaymentType, RawTransaction};
//! use netsettle_ledger::{LedgerConfig, PartyRegistry};
//! use netsettle_settlement::SettlementRun;
//!
//! let upi = || vec![PaymentType::new("UPI")];
//! let registry = PartyRegistry::from_parties(
//!     vec![Party::new("A", upi()), Party::new("B", upi()), Party::new("C", upi())],
//!     &LedgerConfig::default(),
//! )?;
//!
//! let mut run = SettlementRun::new(&registry, LedgerConfig::default());
//! let report = run.execute(&[
//!     RawTransaction::new("A", "B", 100),
//!     RawTransaction::new("B", "C", 200),
//! ])?;
//!
//! assert_eq!(report.plan.transfers().len(), 2);
//! # Ok::<(), netsettle_common::NetSettleError>(())
//! ```

pub mod engine;
pub mod plan;
pub mod run;

pub use engine::SettlementEngine;
pub use plan::{PayerGroup, PlanStats, SettlementPlan};
pub use run::{RunReport, SettlementRun};
