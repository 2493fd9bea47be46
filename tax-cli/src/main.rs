use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use tax_cli::commands::{BreakdownCommand, CompareCommand, RulesCommand};
use tax_cli::logging;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Indian income-tax calculator.
///
/// Computes tax under the NEW and OLD regimes from salary profiles and shows
/// which one costs less.
#[derive(Debug, Parser)]
#[command(name = "tax-regime", version)]
struct Cli {
    /// Log level or filter directive (e.g. `debug`, `warn,tax_core=trace`).
    /// Overrides RUST_LOG.
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare both regimes for every profile in a CSV or TOML file
    Compare(CompareCommand),
    /// Show the slab-by-slab tax on a taxable income
    Breakdown(BreakdownCommand),
    /// Show the active tax-year rules
    Rules(RulesCommand),
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    debug!(command = ?cli.command, "starting");

    match &cli.command {
        Command::Compare(cmd) => cmd.exec(),
        Command::Breakdown(cmd) => cmd.exec(),
        Command::Rules(cmd) => cmd.exec(),
    }
}
