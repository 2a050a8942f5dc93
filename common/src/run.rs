//! Settlement run lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a settlement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Run created, nothing aggregated yet.
    Pending,
    /// Transactions folded into net balances.
    Aggregated,
    /// Extreme matching in progress.
    Settling,
    /// All balances cleared.
    Settled,
    /// Run aborted with an error.
    Failed,
}

impl RunStatus {
    /// Check if this is a final state.
    pub fn is_final(&self) -> bool {
        matches!(self, RunStatus::Settled | RunStatus::Failed)
    }

    /// Check if the run is still in progress.
    pub fn is_in_progress(&self) -> bool {
        !self.is_final()
    }

    /// Get valid next states from current state.
    pub fn valid_transitions(&self) -> &[RunStatus] {
        match self {
            RunStatus::Pending => &[RunStatus::Aggregated, RunStatus::Failed],
            RunStatus::Aggregated => &[RunStatus::Settling, RunStatus::Failed],
            RunStatus::Settling => &[RunStatus::Settled, RunStatus::Failed],
            RunStatus::Settled => &[],
            RunStatus::Failed => &[],
        }
    }

    /// Check if transition to given state is valid.
    pub fn can_transition_to(&self, next: RunStatus) -> bool {
        self.valid_transitions().contains(&next)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStatus::Pending => "PENDING",
            RunStatus::Aggregated => "AGGREGATED",
            RunStatus::Settling => "SETTLING",
            RunStatus::Settled => "SETTLED",
            RunStatus::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(RunStatus::Pending.can_transition_to(RunStatus::Aggregated));
        assert!(RunStatus::Aggregated.can_transition_to(RunStatus::Settling));
        assert!(RunStatus::Settling.can_transition_to(RunStatus::Settled));
    }

    #[test]
    fn test_invalid_transitions() {
        // Can't skip aggregation
        assert!(!RunStatus::Pending.can_transition_to(RunStatus::Settling));
        assert!(!RunStatus::Settled.can_transition_to(RunStatus::Failed));
        assert!(!RunStatus::Failed.can_transition_to(RunStatus::Pending));
    }

    #[test]
    fn test_final_states() {
        assert!(RunStatus::Settled.is_final());
        assert!(RunStatus::Failed.is_final());
        assert!(!RunStatus::Pending.is_final());
        assert!(RunStatus::Settling.is_in_progress());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&RunStatus::Settled).unwrap();
        assert_eq!(json, "\"SETTLED\"");
        assert_eq!(RunStatus::Aggregated.to_string(), "AGGREGATED");
    }
}
