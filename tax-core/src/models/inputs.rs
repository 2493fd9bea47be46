use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Annual salary components as they appear on a salary slip or Form 16.
///
/// Every amount defaults to zero. The engine does not validate signs; callers
/// that capture free-form input are expected to have substituted zero for
/// anything non-numeric before building this value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensationInputs {
    pub basic_salary: Decimal,

    /// Employee provident fund contribution. Pre-tax, excluded from gross.
    pub pf_contribution: Decimal,

    pub house_rent_allowance: Decimal,
    pub conveyance_allowance: Decimal,
    pub leave_travel_allowance: Decimal,
    pub food_card_reimbursement: Decimal,

    /// Captured for completeness; neither part of gross nor deducted.
    pub superannuation_fund: Decimal,

    /// Employee NPS contribution. Pre-tax, excluded from gross.
    pub national_pension_scheme: Decimal,

    pub car_running_expenses: Decimal,
    pub driver_salary: Decimal,
    pub special_allowance: Decimal,
    pub gift_cards: Decimal,
    pub other_income: Decimal,

    /// State-levied professional tax, deducted under both regimes and again
    /// when arriving at net income.
    pub professional_tax: Decimal,

    /// Rent details used only by the HRA exemption.
    pub housing: HousingDetails,
}

/// Optional inputs to the HRA exemption.
///
/// Left at the default (no rent, non-metro), the rent-based candidate of the
/// HRA exemption is zero, so the exemption itself is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingDetails {
    pub actual_rent_paid: Decimal,
    pub metro_city: bool,
}

/// Itemized deductions claimed under Chapter VI-A, plus the claimed standard
/// deduction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionInputs {
    /// Investment-linked deductions (PPF, ELSS, life insurance, ...).
    pub section_80c: Decimal,
    /// Health insurance premiums.
    pub section_80d: Decimal,
    /// Education loan interest.
    pub section_80e: Decimal,
    /// Charitable donations.
    pub section_80g: Decimal,
    /// Savings account interest.
    pub section_80tta: Decimal,

    /// The standard deduction as captured from the user. The engine applies
    /// the amount fixed by the tax-year policy instead.
    pub standard_deduction: Decimal,
}

impl DeductionInputs {
    /// Sum of the Chapter VI-A sections (everything except the standard deduction).
    pub fn itemized_total(&self) -> Decimal {
        self.section_80c + self.section_80d + self.section_80e + self.section_80g + self.section_80tta
    }
}
