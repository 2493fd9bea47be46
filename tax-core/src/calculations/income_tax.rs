//! Income tax under one regime, from salary components to net income.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross income: basic, allowances, perquisites and other income |
//! | 2    | Deductions: standard deduction, PF + NPS, professional tax, and under the OLD regime the allowance exemptions and Chapter VI-A deductions |
//! | 3    | Taxable income (Step 1 - Step 2, minimum 0) |
//! | 4    | Tax from the regime's slab table |
//! | 5    | Rebate u/s 87A (full cap or nothing, depending on the threshold) |
//! | 6    | Tax after rebate (Step 4 - Step 5, minimum 0) |
//! | 7    | Health and education cess on Step 6 |
//! | 8    | Total liability (Step 6 + Step 7) |
//! | 9    | Net income (Step 1 - Step 8 - professional tax) |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::{
//!     CompensationInputs, DeductionInputs, IncomeTaxCalculator, Regime, TaxYearConfig,
//! };
//!
//! let config = TaxYearConfig::fy_2024_25();
//! let calculator = IncomeTaxCalculator::new(&config);
//!
//! let compensation = CompensationInputs {
//!     basic_salary: dec!(900000),
//!     special_allowance: dec!(300000),
//!     ..Default::default()
//! };
//!
//! let result = calculator.compute(&compensation, &DeductionInputs::default(), Regime::New);
//!
//! assert_eq!(result.taxable_income, dec!(1150000));
//! // 15000 + 30000 + 15% of 250000
//! assert_eq!(result.tax, dec!(82500));
//! assert_eq!(result.cess, dec!(3300));
//! assert_eq!(result.total_liability, dec!(85800));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::calculations::common::max;
use crate::calculations::exemptions::{
    conveyance_exemption, food_card_exemption, hra_exemption, lta_exemption,
};
use crate::calculations::slab_tax::{slab_lines, slab_tax};
use crate::{
    CompensationInputs, DeductionBreakdown, DeductionInputs, Regime, RegimeRules, SlabBreakdown,
    TaxResult, TaxYearConfig,
};

/// Computes income tax against one tax year's policy.
///
/// The calculator only borrows the policy, so it is cheap to build and safe
/// to share across threads; every call is a pure function of its arguments.
#[derive(Debug, Clone, Copy)]
pub struct IncomeTaxCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> IncomeTaxCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a TaxYearConfig {
        self.config
    }

    /// Runs every step for `regime` and returns the complete result.
    pub fn compute(
        &self,
        compensation: &CompensationInputs,
        deductions: &DeductionInputs,
        regime: Regime,
    ) -> TaxResult {
        let rules = self.config.rules(regime);

        let gross_income = self.gross_income(compensation);
        let breakdown = self.deductions(compensation, deductions, rules);
        let total_deductions = breakdown.total();
        let taxable_income = self.taxable_income(gross_income, total_deductions);

        let tax_before_rebate = slab_tax(taxable_income, &rules.slabs);
        let rebate = self.rebate(taxable_income, tax_before_rebate, rules);
        let tax = self.tax_after_rebate(tax_before_rebate, rebate);
        let cess = self.cess(tax);
        let total_liability = tax + cess;
        let net_income = gross_income - total_liability - compensation.professional_tax;

        debug!(
            %regime,
            %gross_income,
            %total_deductions,
            %taxable_income,
            %rebate,
            %total_liability,
            "computed income tax"
        );

        TaxResult {
            regime,
            gross_income,
            standard_deduction: breakdown.standard_deduction,
            total_deductions,
            deductions: breakdown,
            taxable_income,
            tax_before_rebate,
            rebate,
            tax,
            cess,
            total_liability,
            net_income,
        }
    }

    /// Per-slab view of the tax on `taxable_income` under `regime`.
    pub fn slab_breakdown(
        &self,
        taxable_income: Decimal,
        regime: Regime,
    ) -> SlabBreakdown {
        let lines = slab_lines(taxable_income, &self.config.rules(regime).slabs);
        let total_tax = lines.iter().map(|line| line.tax).sum();

        SlabBreakdown {
            regime,
            taxable_income,
            lines,
            total_tax,
        }
    }

    /// Sums the components that count towards gross income.
    ///
    /// PF, NPS and superannuation contributions and professional tax are not
    /// part of gross income.
    fn gross_income(
        &self,
        c: &CompensationInputs,
    ) -> Decimal {
        c.basic_salary
            + c.house_rent_allowance
            + c.conveyance_allowance
            + c.leave_travel_allowance
            + c.food_card_reimbursement
            + c.car_running_expenses
            + c.driver_salary
            + c.special_allowance
            + c.gift_cards
            + c.other_income
    }

    /// Builds the deduction breakdown, zeroing the components `rules` disallow.
    fn deductions(
        &self,
        c: &CompensationInputs,
        d: &DeductionInputs,
        rules: &RegimeRules,
    ) -> DeductionBreakdown {
        let limits = &self.config.exemptions;
        let when = |applies: bool, amount: Decimal| if applies { amount } else { Decimal::ZERO };

        let breakdown = DeductionBreakdown {
            standard_deduction: self.config.standard_deduction,
            employee_contributions: c.pf_contribution + c.national_pension_scheme,
            hra_exemption: when(
                rules.hra_exemption,
                hra_exemption(c.basic_salary, c.house_rent_allowance, &c.housing, limits),
            ),
            lta_exemption: when(
                rules.lta_exemption,
                lta_exemption(c.leave_travel_allowance, c.basic_salary, limits),
            ),
            conveyance_exemption: when(
                rules.conveyance_exemption,
                conveyance_exemption(c.conveyance_allowance, limits),
            ),
            food_card_exemption: when(
                rules.food_card_exemption,
                food_card_exemption(c.food_card_reimbursement, limits),
            ),
            itemized_deductions: when(rules.itemized_deductions, d.itemized_total()),
            professional_tax: c.professional_tax,
        };

        trace!(?breakdown, "deduction breakdown");
        breakdown
    }

    /// Calculates taxable income, floored at zero.
    fn taxable_income(
        &self,
        gross_income: Decimal,
        total_deductions: Decimal,
    ) -> Decimal {
        max(gross_income - total_deductions, Decimal::ZERO)
    }

    /// Rebate u/s 87A.
    ///
    /// At or below the threshold the rebate is the tax itself, up to the cap.
    /// Above the threshold it is zero, however small the excess.
    fn rebate(
        &self,
        taxable_income: Decimal,
        tax: Decimal,
        rules: &RegimeRules,
    ) -> Decimal {
        if taxable_income <= rules.rebate_threshold {
            tax.min(rules.rebate_cap)
        } else {
            Decimal::ZERO
        }
    }

    fn tax_after_rebate(
        &self,
        tax: Decimal,
        rebate: Decimal,
    ) -> Decimal {
        max(tax - rebate, Decimal::ZERO)
    }

    fn cess(
        &self,
        tax_after_rebate: Decimal,
    ) -> Decimal {
        max(tax_after_rebate, Decimal::ZERO) * self.config.cess_rate
    }
}
