//! Compare command - both regimes for every salary profile in a file

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tax_core::{IncomeTaxCalculator, RegimeComparison};
use tax_data::SalaryProfileLoader;
use tracing::info;

use crate::commands::PolicyArgs;
use crate::report::{ComparisonReport, comparison_summary, comparison_table};

#[derive(Args, Debug, Clone)]
pub struct CompareCommand {
    /// Salary profiles (CSV or TOML).
    pub input: PathBuf,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    pub json: bool,
}

impl CompareCommand {
    pub fn exec(&self) -> Result<()> {
        self.run(&mut io::stdout().lock())
    }

    pub fn run<W: Write>(
        &self,
        out: &mut W,
    ) -> Result<()> {
        let config = self.policy.load()?;
        let calculator = IncomeTaxCalculator::new(&config);
        let profiles = SalaryProfileLoader::load_from_file(&self.input)
            .with_context(|| format!("failed to load profiles from {}", self.input.display()))?;

        info!(
            profiles = profiles.len(),
            tax_year = %config.tax_year,
            "comparing regimes"
        );

        let comparisons: Vec<(String, RegimeComparison)> = profiles
            .into_iter()
            .map(|profile| {
                let comparison =
                    RegimeComparison::compute(&calculator, &profile.compensation, &profile.deductions);
                (profile.label, comparison)
            })
            .collect();

        if self.json {
            let reports: Vec<ComparisonReport<'_>> = comparisons
                .iter()
                .map(|(label, comparison)| ComparisonReport { label, comparison })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &reports)?;
            writeln!(out)?;
            return Ok(());
        }

        writeln!(out)?;
        writeln!(out, "TAX REGIME COMPARISON ({})", config.tax_year)?;
        for (label, comparison) in &comparisons {
            writeln!(out)?;
            writeln!(out, "{label}")?;
            writeln!(out, "{}", comparison_table(comparison))?;
            writeln!(out, "{}", comparison_summary(label, comparison))?;
        }

        Ok(())
    }
}
