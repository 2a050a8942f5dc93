//! Rendering of finished runs.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use netsettle_common::{PartyId, RunId, Transfer};
use netsettle_settlement::{PlanStats, RunReport};

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// One line per transfer, grouped by payer.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// Net position of one party before settlement.
#[derive(Debug, Serialize)]
pub struct BalanceEntry<'a> {
    pub party: &'a PartyId,
    pub balance: i64,
}

/// A record skipped during aggregation.
#[derive(Debug, Serialize)]
pub struct RejectedEntry {
    pub index: usize,
    pub code: &'static str,
    pub message: String,
}

/// JSON shape of a run report.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub run_id: RunId,
    pub created_at: DateTime<Utc>,
    pub no_transactions_needed: bool,
    pub transfers: &'a [Transfer],
    pub stats: PlanStats,
    pub balances: Vec<BalanceEntry<'a>>,
    pub rejected: Vec<RejectedEntry>,
}

impl<'a> From<&'a RunReport> for ReportDocument<'a> {
    fn from(report: &'a RunReport) -> Self {
        Self {
            run_id: report.plan.run_id,
            created_at: report.plan.created_at,
            no_transactions_needed: report.plan.is_noop(),
            transfers: report.plan.transfers(),
            stats: report.plan.stats,
            balances: report
                .balances
                .iter()
                .map(|(party, balance)| BalanceEntry { party, balance })
                .collect(),
            rejected: report
                .rejected
                .iter()
                .map(|r| RejectedEntry {
                    index: r.index,
                    code: r.error.error_code(),
                    message: r.error.to_string(),
                })
                .collect(),
        }
    }
}

/// Render `report` in the requested format. The result ends with a newline.
pub fn render(report: &RunReport, format: ReportFormat) -> anyhow::Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => {
            let mut json = serde_json::to_string_pretty(&ReportDocument::from(report))?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn render_text(report: &RunReport) -> String {
    let mut out = String::new();

    if report.plan.is_noop() {
        out.push_str("No transactions needed.\n");
    }

    for group in report.plan.by_payer() {
        for transfer in group.transfers {
            let _ = writeln!(
                out,
                "{} pays {} ${}",
                group.payer, transfer.payee, transfer.amount
            );
        }
    }

    for rejected in &report.rejected {
        let _ = writeln!(
            out,
            "Skipped transaction {}: {}",
            rejected.index + 1,
            rejected.error
        );
    }

    out
}
