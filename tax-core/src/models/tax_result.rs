use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Regime;

/// Each amount excluded from gross income on the way to taxable income.
///
/// Components that do not apply under the regime being computed are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    pub standard_deduction: Decimal,
    /// PF plus NPS contributions.
    pub employee_contributions: Decimal,
    pub hra_exemption: Decimal,
    pub lta_exemption: Decimal,
    pub conveyance_exemption: Decimal,
    pub food_card_exemption: Decimal,
    /// Sections 80C, 80D, 80E, 80G and 80TTA combined.
    pub itemized_deductions: Decimal,
    pub professional_tax: Decimal,
}

impl DeductionBreakdown {
    pub fn total(&self) -> Decimal {
        self.standard_deduction
            + self.employee_contributions
            + self.hra_exemption
            + self.lta_exemption
            + self.conveyance_exemption
            + self.food_card_exemption
            + self.itemized_deductions
            + self.professional_tax
    }
}

/// The full outcome of one regime's computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub regime: Regime,
    pub gross_income: Decimal,
    pub standard_deduction: Decimal,

    /// Everything subtracted from gross income, standard deduction included.
    /// May exceed `gross_income`; taxable income is floored separately.
    pub total_deductions: Decimal,
    pub deductions: DeductionBreakdown,

    pub taxable_income: Decimal,
    pub tax_before_rebate: Decimal,
    pub rebate: Decimal,

    /// Tax after rebate and before cess.
    pub tax: Decimal,
    pub cess: Decimal,
    pub total_liability: Decimal,

    /// Gross income less total liability and professional tax.
    pub net_income: Decimal,
}

/// One slab's contribution to the tax on a given income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketLine {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    pub taxed_amount: Decimal,
    pub tax: Decimal,
}

impl BracketLine {
    /// Human-readable range such as `300000 - 600000` or `1500000+`.
    pub fn range_label(&self) -> String {
        match self.max_income {
            Some(max) => format!("{} - {}", self.min_income.normalize(), max.normalize()),
            None => format!("{}+", self.min_income.normalize()),
        }
    }
}

/// Per-slab view of the tax on a taxable income, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabBreakdown {
    pub regime: Regime,
    pub taxable_income: Decimal,
    pub lines: Vec<BracketLine>,
    pub total_tax: Decimal,
}
