//! CLI configuration.

use std::str::FromStr;

use anyhow::{anyhow, Context};
use netsettle_ledger::LedgerConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("unknown log format '{}', expected 'text' or 'json'", other)),
        }
    }
}

/// Main CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log format.
    pub log_format: LogFormat,
    /// Ledger limits and policies.
    pub ledger: LedgerConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            ledger: LedgerConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self {
            ledger: LedgerConfig::from_env().context("invalid ledger settings in environment")?,
            ..Self::default()
        };

        if let Ok(level) = std::env::var("NETSETTLE_LOG_LEVEL") {
            config.log_level = level;
        }

        if let Ok(format) = std::env::var("NETSETTLE_LOG_FORMAT") {
            config.log_format = format.parse()?;
        }

        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.log_level.trim().is_empty() {
            return Err(anyhow!("log level cannot be empty"));
        }

        self.ledger.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = CliConfig::default();
        config.log_level = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.ledger.max_name_len = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("plain".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
