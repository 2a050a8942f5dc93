//! Ledger inputs: JSON files and built-in scenarios.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use netsettle_common::{Party, PaymentType, RawTransaction};

/// A set of parties and the IOUs between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Parties in registration order.
    pub parties: Vec<Party>,
    /// Raw transactions in input order.
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
}

impl Scenario {
    /// Names accepted by [`Scenario::load`].
    pub const BUILT_IN: [&'static str; 4] = ["triangle", "balanced", "type-mismatch", "chain"];

    /// Load a built-in scenario by name.
    pub fn load(name: &str) -> anyhow::Result<Self> {
        match name {
            "triangle" => Ok(Self::triangle()),
            "balanced" => Ok(Self::balanced()),
            "type-mismatch" => Ok(Self::type_mismatch()),
            "chain" => Ok(Self::chain()),
            _ => Err(anyhow::anyhow!(
                "Unknown scenario: {} (available: {})",
                name,
                Self::BUILT_IN.join(", ")
            )),
        }
    }

    /// Parse a ledger document.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("malformed ledger JSON")
    }

    /// Read a ledger file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ledger file {}", path.display()))?;
        let mut scenario = Self::from_json(&json)
            .with_context(|| format!("failed to parse ledger file {}", path.display()))?;
        if scenario.name.is_empty() {
            scenario.name = path.display().to_string();
        }
        Ok(scenario)
    }

    /// Three banks where two owe into the third.
    fn triangle() -> Self {
        Self {
            name: "triangle".to_string(),
            description: "A owes B 100, B owes C 200".to_string(),
            parties: vec![
                bank("A", &["UPI", "NEFT"]),
                bank("B", &["UPI"]),
                bank("C", &["NEFT", "UPI"]),
            ],
            transactions: vec![
                RawTransaction::new("A", "B", 100),
                RawTransaction::new("B", "C", 200),
            ],
        }
    }

    /// Nobody owes anybody.
    fn balanced() -> Self {
        Self {
            name: "balanced".to_string(),
            description: "Three banks with no outstanding IOUs".to_string(),
            parties: vec![bank("A", &["UPI"]), bank("B", &["UPI"]), bank("C", &["UPI"])],
            transactions: Vec::new(),
        }
    }

    /// A single pair with nothing in common.
    fn type_mismatch() -> Self {
        Self {
            name: "type-mismatch".to_string(),
            description: "Debtor and creditor accept disjoint payment types".to_string(),
            parties: vec![bank("A", &["UPI"]), bank("B", &["NEFT"])],
            transactions: vec![RawTransaction::new("A", "B", 50)],
        }
    }

    /// Six banks with overlapping obligations and one cycle.
    fn chain() -> Self {
        Self {
            name: "chain".to_string(),
            description: "Overlapping obligations between six banks".to_string(),
            parties: vec![
                bank("SBI", &["NEFT", "RTGS", "IMPS"]),
                bank("HDFC", &["RTGS", "UPI"]),
                bank("ICICI", &["UPI", "NEFT"]),
                bank("AXIS", &["IMPS", "NEFT"]),
                bank("KOTAK", &["UPI", "RTGS"]),
                bank("YES", &["NEFT"]),
            ],
            transactions: vec![
                RawTransaction::new("SBI", "HDFC", 300),
                RawTransaction::new("HDFC", "ICICI", 700),
                RawTransaction::new("ICICI", "SBI", 200),
                RawTransaction::new("AXIS", "SBI", 150),
                RawTransaction::new("KOTAK", "HDFC", 400),
                RawTransaction::new("SBI", "YES", 100),
                RawTransaction::new("ICICI", "KOTAK", 50),
                RawTransaction::new("YES", "AXIS", 60),
            ],
        }
    }
}

fn bank(name: &str, types: &[&str]) -> Party {
    Party::new(name, types.iter().map(|t| PaymentType::from(*t)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_built_ins_load() {
        for name in Scenario::BUILT_IN {
            let scenario = Scenario::load(name).unwrap();
            assert_eq!(scenario.name, name);
            assert!(!scenario.parties.is_empty());
        }
        assert!(Scenario::load("nope").is_err());
    }

    #[test]
    fn test_from_json() {
        let scenario = Scenario::from_json(
            r#"{
                "parties": [
                    {"name": "A", "payment_types": ["UPI"]},
                    {"name": "B", "payment_types": ["UPI", "NEFT"]}
                ],
                "transactions": [
                    {"debtor": "A", "creditor": "B", "amount": 40},
                    {"debtor": "B", "creditor": "A", "amount": 15, "payment_type": "UPI"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(scenario.parties.len(), 2);
        assert_eq!(scenario.transactions[0], RawTransaction::new("A", "B", 40));
        assert_eq!(
            scenario.transactions[1],
            RawTransaction::new("B", "A", 15).with_payment_type("UPI")
        );
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Scenario::from_json("{\"parties\": 3}").is_err());
        assert!(Scenario::from_json("not json").is_err());
    }
}
