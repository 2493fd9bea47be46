//! Tax-year rules loaded from TOML.
//!
//! The document mirrors [`TaxYearConfig`] field for field. Slab tables are
//! checked while deserialising; the scalar limits are checked afterwards by
//! [`TaxYearConfig::validate`].
//!
//! ```toml
//! tax_year = "FY 2024-25"
//! standard_deduction = 50000
//! cess_rate = "0.04"
//!
//! [exemptions]
//! conveyance_cap = 19200
//! # ...
//!
//! [new_regime]
//! rebate_threshold = 700000
//! # ...
//! slabs = [
//!     { min_income = 0, max_income = 300000, rate = 0 },
//!     { min_income = 300000, rate = 5 },
//! ]
//! ```

use std::path::{Path, PathBuf};

use tax_core::{TaxYearConfig, TaxYearConfigError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid tax-year rules: {0}")]
    Invalid(#[from] TaxYearConfigError),
}

/// Parses and validates a TOML rules document.
pub fn parse_tax_year_config(input: &str) -> Result<TaxYearConfig, ConfigLoadError> {
    let config: TaxYearConfig = toml::from_str(input)?;
    config.validate()?;
    Ok(config)
}

/// Reads, parses and validates the rules file at `path`.
pub fn load_tax_year_config(path: &Path) -> Result<TaxYearConfig, ConfigLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_tax_year_config(&contents)?;
    debug!(path = %path.display(), tax_year = %config.tax_year, "loaded tax-year rules");
    Ok(config)
}
