//! Rules command - the active tax-year policy

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use tax_core::Regime;

use crate::commands::PolicyArgs;
use crate::report::{format_inr, rules_table, slab_schedule_table};

#[derive(Args, Debug, Clone)]
pub struct RulesCommand {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Output as JSON (the same shape `--rules` accepts as TOML)
    #[arg(long)]
    pub json: bool,
}

impl RulesCommand {
    pub fn exec(&self) -> Result<()> {
        self.run(&mut io::stdout().lock())
    }

    pub fn run<W: Write>(
        &self,
        out: &mut W,
    ) -> Result<()> {
        let config = self.policy.load()?;

        if self.json {
            serde_json::to_writer_pretty(&mut *out, &config)?;
            writeln!(out)?;
            return Ok(());
        }

        let limits = &config.exemptions;
        writeln!(out)?;
        writeln!(out, "TAX RULES ({})", config.tax_year)?;
        writeln!(out)?;
        writeln!(out, "Standard deduction:   {}", format_inr(config.standard_deduction))?;
        let cess_percent = (config.cess_rate * Decimal::ONE_HUNDRED).normalize();
        writeln!(out, "Cess rate:            {cess_percent}%")?;
        writeln!(out, "Conveyance cap:       {}", format_inr(limits.conveyance_cap))?;
        writeln!(out, "Food card cap:        {}", format_inr(limits.food_card_cap))?;
        writeln!(out, "LTA cap:              {}x basic salary", limits.lta_basic_multiple.normalize())?;

        for regime in Regime::ALL {
            writeln!(out)?;
            writeln!(out, "{} slabs", regime.label())?;
            writeln!(out, "{}", slab_schedule_table(config.rules(regime)))?;
        }

        writeln!(out)?;
        writeln!(out, "{}", rules_table(&config))?;
        Ok(())
    }
}
