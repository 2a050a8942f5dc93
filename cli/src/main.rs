//! netsettle
//!
//! Reduces a ledger of IOUs between parties to a short list of transfers.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod controller;
mod generator;
mod interactive;
mod report;
mod scenario;

use config::{CliConfig, LogFormat};
use controller::SettlementController;
use generator::LedgerGenerator;
use netsettle_ledger::InvalidRecordPolicy;
use report::ReportFormat;
use scenario::Scenario;

/// netsettle CLI
#[derive(Parser, Debug)]
#[command(name = "netsettle", version)]
#[command(about = "Minimise the number of payments needed to clear a ledger of IOUs")]
struct Args {
    /// Report format
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Skip invalid transactions instead of aborting the run
    #[arg(long, global = true)]
    skip_invalid: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Settle a JSON ledger file
    Settle {
        /// Ledger file
        file: PathBuf,
    },

    /// Enter banks and transactions at the console
    Interactive,

    /// Settle a built-in scenario
    Scenario {
        /// Scenario name (triangle, balanced, type-mismatch, chain)
        name: String,
    },

    /// Settle a randomly generated ledger
    Simulate {
        /// Number of banks
        #[arg(short, long, default_value = "5")]
        parties: usize,

        /// Number of IOUs
        #[arg(short, long, default_value = "20")]
        transactions: usize,

        /// Largest IOU amount
        #[arg(long, default_value = "1000")]
        max_amount: i64,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_tracing(config: &CliConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
    );

    let (text, json) = match config.log_format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer().with_writer(io::stderr)), None),
        LogFormat::Json => (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = CliConfig::from_env()?;
    if args.skip_invalid {
        config.ledger.on_invalid = InvalidRecordPolicy::Skip;
    }
    config.validate().context("invalid configuration")?;

    init_tracing(&config);

    let scenario = match &args.command {
        Command::Settle { file } => Scenario::from_file(file)?,
        Command::Interactive => {
            let stdin = io::stdin();
            interactive::read_scenario(stdin.lock(), io::stderr())?
        }
        Command::Scenario { name } => Scenario::load(name)?,
        Command::Simulate {
            parties,
            transactions,
            max_amount,
            seed,
        } => LedgerGenerator::new(*seed, *max_amount).generate(*parties, *transactions)?,
    };

    info!(scenario = %scenario.name, "Starting netsettle");

    let controller = SettlementController::new(config.ledger.clone());
    let report = match controller.settle(&scenario) {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Settlement failed");
            return Err(e);
        }
    };

    let rendered = report::render(&report, args.format)?;
    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("failed to write report to {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
