//! Subcommands. Each one renders to any [`std::io::Write`] so reports can be
//! captured in tests; `exec` points it at stdout.

pub mod breakdown;
pub mod compare;
pub mod rules;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tax_core::{Regime, TaxYearConfig};
use tax_data::{SlabTableLoader, load_tax_year_config};
use tracing::info;

pub use breakdown::BreakdownCommand;
pub use compare::CompareCommand;
pub use rules::RulesCommand;

/// Where the tax-year rules come from.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Tax-year rules (TOML). Defaults to the built-in FY 2024-25 rules.
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Slab tables (CSV: tax_year,regime,min_income,max_income,rate) applied
    /// on top of the rules.
    #[arg(long, value_name = "FILE")]
    pub slabs: Option<PathBuf>,
}

impl PolicyArgs {
    pub fn load(&self) -> Result<TaxYearConfig> {
        let mut config = match &self.rules {
            Some(path) => load_tax_year_config(path)
                .with_context(|| format!("failed to load rules from {}", path.display()))?,
            None => TaxYearConfig::fy_2024_25(),
        };

        if let Some(path) = &self.slabs {
            let file = File::open(path)
                .with_context(|| format!("failed to open slab file {}", path.display()))?;
            let records = SlabTableLoader::parse(file)
                .with_context(|| format!("failed to parse slab file {}", path.display()))?;
            let replaced = SlabTableLoader::apply(&mut config, &records)
                .with_context(|| format!("invalid slab file {}", path.display()))?;
            info!(path = %path.display(), replaced, "applied slab tables");
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegimeArg {
    New,
    Old,
}

impl From<RegimeArg> for Regime {
    fn from(arg: RegimeArg) -> Self {
        match arg {
            RegimeArg::New => Regime::New,
            RegimeArg::Old => Regime::Old,
        }
    }
}
