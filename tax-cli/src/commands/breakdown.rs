//! Breakdown command - slab-by-slab tax on a taxable income

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use tax_core::{IncomeTaxCalculator, Regime, SlabBreakdown};
use tax_data::amount::MAX_AMOUNT_RUPEES;

use crate::commands::{PolicyArgs, RegimeArg};
use crate::report::{breakdown_table, format_inr, marginal_rate};

#[derive(Args, Debug, Clone)]
pub struct BreakdownCommand {
    /// Taxable income (thousands separators allowed, e.g. 9,21,200)
    #[arg(long, value_parser = parse_income)]
    pub income: Decimal,

    /// Regime to show. Both when omitted.
    #[arg(long, value_enum)]
    pub regime: Option<RegimeArg>,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    pub json: bool,
}

/// Strict parse for a command-line amount: unlike profile cells, a typo here
/// is reported rather than read as zero.
pub fn parse_income(input: &str) -> Result<Decimal, String> {
    let value = input
        .trim()
        .replace(',', "")
        .parse::<Decimal>()
        .map_err(|e| format!("'{input}' is not an amount: {e}"))?;

    if value < Decimal::ZERO {
        return Err(format!("'{input}' is negative"));
    }
    if value > Decimal::from(MAX_AMOUNT_RUPEES) {
        return Err(format!("'{input}' exceeds {MAX_AMOUNT_RUPEES}"));
    }
    Ok(value)
}

impl BreakdownCommand {
    pub fn exec(&self) -> Result<()> {
        self.run(&mut io::stdout().lock())
    }

    pub fn run<W: Write>(
        &self,
        out: &mut W,
    ) -> Result<()> {
        let config = self.policy.load()?;
        let calculator = IncomeTaxCalculator::new(&config);

        let regimes = match self.regime {
            Some(regime) => vec![Regime::from(regime)],
            None => Regime::ALL.to_vec(),
        };
        let breakdowns: Vec<SlabBreakdown> = regimes
            .into_iter()
            .map(|regime| calculator.slab_breakdown(self.income, regime))
            .collect();

        if self.json {
            serde_json::to_writer_pretty(&mut *out, &breakdowns)?;
            writeln!(out)?;
            return Ok(());
        }

        for breakdown in &breakdowns {
            writeln!(out)?;
            writeln!(
                out,
                "{} on {} ({})",
                breakdown.regime.label(),
                format_inr(breakdown.taxable_income),
                config.tax_year
            )?;
            writeln!(out, "{}", breakdown_table(breakdown))?;
            writeln!(out, "Tax before rebate and cess: {}", format_inr(breakdown.total_tax))?;
            writeln!(
                out,
                "Marginal rate: {}",
                marginal_rate(config.rules(breakdown.regime), breakdown.taxable_income)
            )?;
        }

        Ok(())
    }
}
