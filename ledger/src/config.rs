//! Ledger configuration.

use std::fmt;
use std::str::FromStr;

use netsettle_common::{NetSettleError, Result};
use serde::{Deserialize, Serialize};

/// Legacy console programs truncated bank names at this length.
pub const DEFAULT_MAX_NAME_LEN: usize = 50;

/// What to do with a transaction the aggregator rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRecordPolicy {
    /// Fail the whole batch on the first rejected record.
    #[default]
    Abort,
    /// Collect the rejection and keep folding the rest.
    Skip,
}

impl FromStr for InvalidRecordPolicy {
    type Err = NetSettleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(InvalidRecordPolicy::Abort),
            "skip" => Ok(InvalidRecordPolicy::Skip),
            other => Err(NetSettleError::ConfigurationError(format!(
                "unknown invalid-record policy '{}', expected 'abort' or 'skip'",
                other
            ))),
        }
    }
}

impl fmt::Display for InvalidRecordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidRecordPolicy::Abort => f.write_str("abort"),
            InvalidRecordPolicy::Skip => f.write_str("skip"),
        }
    }
}

/// Limits and policies applied while building a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Maximum number of registered parties. `None` means unbounded.
    pub max_parties: Option<usize>,
    /// Maximum party name length in characters. `None` means unbounded.
    pub max_name_len: Option<usize>,
    /// Handling of rejected transactions.
    pub on_invalid: InvalidRecordPolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_parties: None,
            max_name_len: Some(DEFAULT_MAX_NAME_LEN),
            on_invalid: InvalidRecordPolicy::Abort,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(limit) = std::env::var("NETSETTLE_MAX_PARTIES") {
            config.max_parties = Some(parse_limit("NETSETTLE_MAX_PARTIES", &limit)?);
        }

        if let Ok(limit) = std::env::var("NETSETTLE_MAX_NAME_LEN") {
            config.max_name_len = Some(parse_limit("NETSETTLE_MAX_NAME_LEN", &limit)?);
        }

        if let Ok(policy) = std::env::var("NETSETTLE_ON_INVALID") {
            config.on_invalid = policy.parse()?;
        }

        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_parties == Some(0) {
            return Err(NetSettleError::ConfigurationError(
                "max_parties cannot be 0".to_string(),
            ));
        }

        if self.max_name_len == Some(0) {
            return Err(NetSettleError::ConfigurationError(
                "max_name_len cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_limit(var: &str, value: &str) -> Result<usize> {
    value.trim().parse().map_err(|_| {
        NetSettleError::ConfigurationError(format!(
            "{} must be a positive integer, got '{}'",
            var, value
        ))
    })
}
