//! Income-tax engine for comparing the NEW and OLD regimes.
//!
//! The crate is split into reference data ([`models`]) and the pure numeric
//! transforms that consume it ([`calculations`]). The free functions
//! re-exported here run against the built-in FY 2024-25 policy; use
//! [`IncomeTaxCalculator`] to run against any other [`TaxYearConfig`].

pub mod calculations;
pub mod models;

pub use calculations::{
    IncomeTaxCalculator, RegimeComparison, compare_regimes, compute_tax, slab_breakdown,
};
pub use models::*;
