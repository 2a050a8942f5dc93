//! NetSettle Common Types
//!
//! This crate contains shared types used across the netsettle pipeline,
//! including party identity, raw transactions, settlement transfers,
//! run lifecycle status and the error type.

pub mod identifiers;
pub mod party;
pub mod transaction;
pub mod run;
pub mod error;

pub use identifiers::*;
pub use party::*;
pub use transaction::*;
pub use run::*;
pub use error::*;
