//! Input capture and reference-data loading for the income-tax engine.
//!
//! - [`amount`]: lenient amount parsing, where anything non-numeric is zero.
//! - [`profile_loader`]: salary profiles from CSV or TOML.
//! - [`slab_loader`]: slab tables from CSV.
//! - [`config`]: whole tax-year rule sets from TOML.

pub mod amount;
pub mod config;
pub mod profile_loader;
pub mod slab_loader;

pub use amount::{parse_amount, parse_flag};
pub use config::{ConfigLoadError, load_tax_year_config, parse_tax_year_config};
pub use profile_loader::{ProfileLoadError, SalaryProfile, SalaryProfileLoader, SalaryRecord};
pub use slab_loader::{SlabRecord, SlabTableLoader, SlabTableLoaderError};
