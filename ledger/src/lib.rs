//! NetSettle Ledger Aggregator
//!
//! Folds raw pairwise transactions into per-pair ledgers and per-party net
//! balances. The sum of all net balances is always zero.

pub mod config;
pub mod registry;
pub mod pair;
pub mod balance;
pub mod aggregator;

pub use config::{InvalidRecordPolicy, LedgerConfig};
pub use registry::PartyRegistry;
pub use pair::PairLedger;
pub use balance::NetBalances;
pub use aggregator::{aggregate, Aggregation, AggregationStats, LedgerAggregator, RejectedRecord};
