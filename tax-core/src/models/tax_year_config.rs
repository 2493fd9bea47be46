use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Regime, SlabTable, TaxSlab};

/// Errors raised by [`TaxYearConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxYearConfigError {
    #[error("standard deduction must be non-negative, got {0}")]
    NegativeStandardDeduction(Decimal),

    #[error("cess rate must be between 0 and 1, got {0}")]
    InvalidCessRate(Decimal),

    #[error("{field} must be between 0 and 1, got {value}")]
    InvalidFraction { field: &'static str, value: Decimal },

    #[error("{field} must be non-negative, got {value}")]
    NegativeLimit { field: &'static str, value: Decimal },

    #[error("{regime} regime rebate {field} must be non-negative, got {value}")]
    NegativeRebate {
        regime: Regime,
        field: &'static str,
        value: Decimal,
    },
}

/// Which allowance exemptions and deductions a regime honours, plus its own
/// slab table and rebate terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeRules {
    pub slabs: SlabTable,

    /// Taxable income at or below which the rebate applies (inclusive).
    pub rebate_threshold: Decimal,
    pub rebate_cap: Decimal,

    pub hra_exemption: bool,
    pub lta_exemption: bool,
    pub conveyance_exemption: bool,
    pub food_card_exemption: bool,

    /// Sections 80C, 80D, 80E, 80G and 80TTA.
    pub itemized_deductions: bool,
}

/// Caps and fractions shared by the allowance exemptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptionLimits {
    /// Annual cap on the conveyance allowance exemption.
    pub conveyance_cap: Decimal,

    /// Annual cap on the food card exemption.
    pub food_card_cap: Decimal,

    /// LTA exemption is capped at this multiple of basic salary.
    pub lta_basic_multiple: Decimal,

    /// Share of basic salary used as the HRA cap in a metro city.
    pub hra_metro_fraction: Decimal,

    /// Share of basic salary used as the HRA cap elsewhere.
    pub hra_non_metro_fraction: Decimal,

    /// Share of basic salary subtracted from rent paid in the HRA rent candidate.
    pub hra_rent_offset_fraction: Decimal,
}

/// Policy constants for one tax year.
///
/// This is reference data, not user data: the calculator borrows it and never
/// mutates it. A year-over-year rule change is a new value of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    /// Label such as `FY 2024-25`.
    pub tax_year: String,
    pub standard_deduction: Decimal,

    /// Health and education cess, applied to tax after rebate (0.04 = 4%).
    pub cess_rate: Decimal,
    pub exemptions: ExemptionLimits,
    pub new_regime: RegimeRules,
    pub old_regime: RegimeRules,
}

impl TaxYearConfig {
    /// Rules for FY 2024-25 (AY 2025-26).
    pub fn fy_2024_25() -> Self {
        Self {
            tax_year: "FY 2024-25".to_string(),
            standard_deduction: dec!(50000),
            cess_rate: dec!(0.04),
            exemptions: ExemptionLimits {
                conveyance_cap: dec!(19200),
                food_card_cap: dec!(26400),
                lta_basic_multiple: dec!(2),
                hra_metro_fraction: dec!(0.5),
                hra_non_metro_fraction: dec!(0.4),
                hra_rent_offset_fraction: dec!(0.1),
            },
            new_regime: RegimeRules {
                slabs: SlabTable::from_trusted(vec![
                    TaxSlab::new(dec!(0), Some(dec!(300000)), dec!(0)),
                    TaxSlab::new(dec!(300000), Some(dec!(600000)), dec!(5)),
                    TaxSlab::new(dec!(600000), Some(dec!(900000)), dec!(10)),
                    TaxSlab::new(dec!(900000), Some(dec!(1200000)), dec!(15)),
                    TaxSlab::new(dec!(1200000), Some(dec!(1500000)), dec!(20)),
                    TaxSlab::new(dec!(1500000), None, dec!(30)),
                ]),
                rebate_threshold: dec!(700000),
                rebate_cap: dec!(25000),
                hra_exemption: false,
                lta_exemption: false,
                conveyance_exemption: false,
                food_card_exemption: false,
                itemized_deductions: false,
            },
            old_regime: RegimeRules {
                slabs: SlabTable::from_trusted(vec![
                    TaxSlab::new(dec!(0), Some(dec!(250000)), dec!(0)),
                    TaxSlab::new(dec!(250000), Some(dec!(500000)), dec!(5)),
                    TaxSlab::new(dec!(500000), Some(dec!(1000000)), dec!(20)),
                    TaxSlab::new(dec!(1000000), None, dec!(30)),
                ]),
                rebate_threshold: dec!(500000),
                rebate_cap: dec!(12500),
                hra_exemption: true,
                lta_exemption: true,
                conveyance_exemption: true,
                food_card_exemption: true,
                itemized_deductions: true,
            },
        }
    }

    /// The rule set for `regime`.
    pub fn rules(
        &self,
        regime: Regime,
    ) -> &RegimeRules {
        match regime {
            Regime::New => &self.new_regime,
            Regime::Old => &self.old_regime,
        }
    }

    pub fn rules_mut(
        &mut self,
        regime: Regime,
    ) -> &mut RegimeRules {
        match regime {
            Regime::New => &mut self.new_regime,
            Regime::Old => &mut self.old_regime,
        }
    }

    /// Validates the scalar policy values. Slab tables are already valid by
    /// construction.
    ///
    /// # Errors
    ///
    /// Returns [`TaxYearConfigError`] if:
    /// - `standard_deduction` is negative
    /// - `cess_rate` is not in [0, 1]
    /// - any HRA fraction is not in [0, 1]
    /// - any cap or the LTA multiple is negative
    /// - a regime's rebate threshold or cap is negative
    pub fn validate(&self) -> Result<(), TaxYearConfigError> {
        if self.standard_deduction < Decimal::ZERO {
            return Err(TaxYearConfigError::NegativeStandardDeduction(
                self.standard_deduction,
            ));
        }
        if !is_fraction(self.cess_rate) {
            return Err(TaxYearConfigError::InvalidCessRate(self.cess_rate));
        }

        let limits = &self.exemptions;
        for (field, value) in [
            ("hra_metro_fraction", limits.hra_metro_fraction),
            ("hra_non_metro_fraction", limits.hra_non_metro_fraction),
            ("hra_rent_offset_fraction", limits.hra_rent_offset_fraction),
        ] {
            if !is_fraction(value) {
                return Err(TaxYearConfigError::InvalidFraction { field, value });
            }
        }
        for (field, value) in [
            ("conveyance_cap", limits.conveyance_cap),
            ("food_card_cap", limits.food_card_cap),
            ("lta_basic_multiple", limits.lta_basic_multiple),
        ] {
            if value < Decimal::ZERO {
                return Err(TaxYearConfigError::NegativeLimit { field, value });
            }
        }

        for regime in Regime::ALL {
            let rules = self.rules(regime);
            for (field, value) in [
                ("threshold", rules.rebate_threshold),
                ("cap", rules.rebate_cap),
            ] {
                if value < Decimal::ZERO {
                    return Err(TaxYearConfigError::NegativeRebate {
                        regime,
                        field,
                        value,
                    });
                }
            }
        }

        Ok(())
    }
}

impl Default for TaxYearConfig {
    fn default() -> Self {
        Self::fy_2024_25()
    }
}

fn is_fraction(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builtin_slab_tables_pass_validation() {
        let config = TaxYearConfig::fy_2024_25();

        for regime in Regime::ALL {
            let slabs = config.rules(regime).slabs.slabs().to_vec();
            assert!(SlabTable::new(slabs).is_ok(), "{regime} slabs invalid");
        }
    }

    #[test]
    fn builtin_config_passes_validation() {
        assert_eq!(TaxYearConfig::fy_2024_25().validate(), Ok(()));
    }

    #[test]
    fn only_old_regime_allows_exemptions() {
        let config = TaxYearConfig::fy_2024_25();
        let new = config.rules(Regime::New);
        let old = config.rules(Regime::Old);

        assert!(!new.hra_exemption && !new.lta_exemption && !new.itemized_deductions);
        assert!(old.hra_exemption && old.lta_exemption && old.itemized_deductions);
        assert!(!new.conveyance_exemption && old.conveyance_exemption);
        assert!(!new.food_card_exemption && old.food_card_exemption);
    }

    #[test]
    fn rules_dispatches_on_regime() {
        let config = TaxYearConfig::fy_2024_25();

        assert_eq!(config.rules(Regime::New).rebate_threshold, dec!(700000));
        assert_eq!(config.rules(Regime::Old).rebate_threshold, dec!(500000));
        assert_eq!(config.rules(Regime::New).rebate_cap, dec!(25000));
        assert_eq!(config.rules(Regime::Old).rebate_cap, dec!(12500));
    }

    #[test]
    fn validate_rejects_cess_above_one() {
        let mut config = TaxYearConfig::fy_2024_25();
        config.cess_rate = dec!(4);

        assert_eq!(
            config.validate(),
            Err(TaxYearConfigError::InvalidCessRate(dec!(4)))
        );
    }

    #[test]
    fn validate_rejects_negative_standard_deduction() {
        let mut config = TaxYearConfig::fy_2024_25();
        config.standard_deduction = dec!(-1);

        assert_eq!(
            config.validate(),
            Err(TaxYearConfigError::NegativeStandardDeduction(dec!(-1)))
        );
    }

    #[test]
    fn validate_rejects_hra_fraction_above_one() {
        let mut config = TaxYearConfig::fy_2024_25();
        config.exemptions.hra_metro_fraction = dec!(50);

        assert_eq!(
            config.validate(),
            Err(TaxYearConfigError::InvalidFraction {
                field: "hra_metro_fraction",
                value: dec!(50),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_cap() {
        let mut config = TaxYearConfig::fy_2024_25();
        config.exemptions.food_card_cap = dec!(-26400);

        assert_eq!(
            config.validate(),
            Err(TaxYearConfigError::NegativeLimit {
                field: "food_card_cap",
                value: dec!(-26400),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_rebate_cap() {
        let mut config = TaxYearConfig::fy_2024_25();
        config.rules_mut(Regime::Old).rebate_cap = dec!(-1);

        assert_eq!(
            config.validate(),
            Err(TaxYearConfigError::NegativeRebate {
                regime: Regime::Old,
                field: "cap",
                value: dec!(-1),
            })
        );
    }
}
