//! Income-tax calculations for the NEW and OLD regimes.
//!
//! [`IncomeTaxCalculator`] runs the full computation against any
//! [`TaxYearConfig`]. The free functions in this module are shorthands that
//! use the built-in FY 2024-25 policy.

pub mod common;
pub mod comparison;
pub mod exemptions;
pub mod income_tax;
pub mod slab_tax;

use std::sync::LazyLock;

use rust_decimal::Decimal;

pub use comparison::RegimeComparison;
pub use income_tax::IncomeTaxCalculator;

use crate::{CompensationInputs, DeductionInputs, Regime, SlabBreakdown, TaxResult, TaxYearConfig};

static FY_2024_25: LazyLock<TaxYearConfig> = LazyLock::new(TaxYearConfig::fy_2024_25);

/// Computes income tax for `regime` under the FY 2024-25 rules.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{compute_tax, CompensationInputs, DeductionInputs, Regime};
///
/// let compensation = CompensationInputs {
///     basic_salary: dec!(750000),
///     ..Default::default()
/// };
///
/// let result = compute_tax(&compensation, &DeductionInputs::default(), Regime::New);
///
/// assert_eq!(result.taxable_income, dec!(700000));
/// assert_eq!(result.rebate, dec!(25000));
/// assert_eq!(result.total_liability, dec!(0));
/// ```
pub fn compute_tax(
    compensation: &CompensationInputs,
    deductions: &DeductionInputs,
    regime: Regime,
) -> TaxResult {
    IncomeTaxCalculator::new(&FY_2024_25).compute(compensation, deductions, regime)
}

/// Per-slab tax on `taxable_income` under the FY 2024-25 rules for `regime`.
pub fn slab_breakdown(
    taxable_income: Decimal,
    regime: Regime,
) -> SlabBreakdown {
    IncomeTaxCalculator::new(&FY_2024_25).slab_breakdown(taxable_income, regime)
}

/// Computes both regimes under the FY 2024-25 rules and picks the cheaper one.
pub fn compare_regimes(
    compensation: &CompensationInputs,
    deductions: &DeductionInputs,
) -> RegimeComparison {
    RegimeComparison::compute(
        &IncomeTaxCalculator::new(&FY_2024_25),
        compensation,
        deductions,
    )
}
