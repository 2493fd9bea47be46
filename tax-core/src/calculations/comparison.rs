//! Side-by-side comparison of both regimes for the same inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::IncomeTaxCalculator;
use crate::{CompensationInputs, DeductionInputs, Regime, TaxResult};

/// Both regime results and the regime with the lower liability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub new_regime: TaxResult,
    pub old_regime: TaxResult,

    /// The regime with the lower total liability. A tie goes to OLD.
    pub better: Regime,

    /// Absolute difference between the two liabilities.
    pub savings: Decimal,
}

impl RegimeComparison {
    /// Computes both regimes for the same inputs and picks the cheaper one.
    pub fn compute(
        calculator: &IncomeTaxCalculator<'_>,
        compensation: &CompensationInputs,
        deductions: &DeductionInputs,
    ) -> Self {
        let new_regime = calculator.compute(compensation, deductions, Regime::New);
        let old_regime = calculator.compute(compensation, deductions, Regime::Old);

        let difference = old_regime.total_liability - new_regime.total_liability;
        let better = if difference > Decimal::ZERO {
            Regime::New
        } else {
            Regime::Old
        };

        debug!(%better, savings = %difference.abs(), "compared regimes");

        Self {
            new_regime,
            old_regime,
            better,
            savings: difference.abs(),
        }
    }

    pub fn result(
        &self,
        regime: Regime,
    ) -> &TaxResult {
        match regime {
            Regime::New => &self.new_regime,
            Regime::Old => &self.old_regime,
        }
    }

    pub fn best(&self) -> &TaxResult {
        self.result(self.better)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::TaxYearConfig;

    #[test]
    fn compare_prefers_old_when_deductions_are_large() {
        let config = TaxYearConfig::fy_2024_25();
        let calculator = IncomeTaxCalculator::new(&config);
        let compensation = CompensationInputs {
            basic_salary: dec!(600000),
            pf_contribution: dec!(72000),
            house_rent_allowance: dec!(300000),
            conveyance_allowance: dec!(19200),
            leave_travel_allowance: dec!(50000),
            food_card_reimbursement: dec!(26400),
            national_pension_scheme: dec!(50000),
            special_allowance: dec!(100000),
            professional_tax: dec!(2400),
            ..Default::default()
        };
        let deductions = DeductionInputs {
            section_80c: dec!(150000),
            section_80d: dec!(25000),
            section_80tta: dec!(10000),
            ..Default::default()
        };

        let comparison = RegimeComparison::compute(&calculator, &compensation, &deductions);

        assert_eq!(comparison.better, Regime::Old);
        // 50107.20 - 42244.80
        assert_eq!(comparison.savings, dec!(7862.40));
        assert_eq!(comparison.best().total_liability, dec!(42244.80));
    }

    #[test]
    fn compare_prefers_new_without_deductions() {
        let config = TaxYearConfig::fy_2024_25();
        let calculator = IncomeTaxCalculator::new(&config);
        let compensation = CompensationInputs {
            basic_salary: dec!(1500000),
            ..Default::default()
        };

        let comparison =
            RegimeComparison::compute(&calculator, &compensation, &DeductionInputs::default());

        // NEW: 1450000 taxable -> 15000 + 30000 + 45000 + 50000 = 140000, +4%
        // OLD: 1450000 taxable -> 12500 + 100000 + 135000 = 247500, +4%
        assert_eq!(comparison.new_regime.total_liability, dec!(145600));
        assert_eq!(comparison.old_regime.total_liability, dec!(257400));
        assert_eq!(comparison.better, Regime::New);
        assert_eq!(comparison.savings, dec!(111800));
    }

    #[test]
    fn compare_tie_goes_to_old() {
        let config = TaxYearConfig::fy_2024_25();
        let calculator = IncomeTaxCalculator::new(&config);

        let comparison = RegimeComparison::compute(
            &calculator,
            &CompensationInputs::default(),
            &DeductionInputs::default(),
        );

        assert_eq!(comparison.better, Regime::Old);
        assert_eq!(comparison.savings, dec!(0));
    }

    #[test]
    fn result_returns_matching_regime() {
        let config = TaxYearConfig::fy_2024_25();
        let calculator = IncomeTaxCalculator::new(&config);

        let comparison = RegimeComparison::compute(
            &calculator,
            &CompensationInputs::default(),
            &DeductionInputs::default(),
        );

        assert_eq!(comparison.result(Regime::New).regime, Regime::New);
        assert_eq!(comparison.result(Regime::Old).regime, Regime::Old);
    }
}
