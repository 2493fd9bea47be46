//! Allowance exemptions available under the OLD regime.
//!
//! Each rule is a [`bounded_exemption`] over its own candidate limits, so the
//! granted amount is the tightest limit and never negative. Whether a rule
//! applies at all is decided by the regime's [`RegimeRules`](crate::RegimeRules)
//! flags, not here.

use rust_decimal::Decimal;

use crate::calculations::common::{bounded_exemption, max};
use crate::{ExemptionLimits, HousingDetails};

/// House rent allowance exemption.
///
/// The least of:
/// 1. the allowance received,
/// 2. rent paid in excess of a share of basic salary (floored at zero),
/// 3. a share of basic salary that depends on whether the city is a metro.
///
/// With no rent paid the second candidate is zero and so is the exemption.
pub fn hra_exemption(
    basic_salary: Decimal,
    house_rent_allowance: Decimal,
    housing: &HousingDetails,
    limits: &ExemptionLimits,
) -> Decimal {
    if house_rent_allowance.is_zero() {
        return Decimal::ZERO;
    }

    let city_fraction = if housing.metro_city {
        limits.hra_metro_fraction
    } else {
        limits.hra_non_metro_fraction
    };
    let rent_over_offset = max(
        housing.actual_rent_paid - basic_salary * limits.hra_rent_offset_fraction,
        Decimal::ZERO,
    );

    bounded_exemption([
        house_rent_allowance,
        rent_over_offset,
        basic_salary * city_fraction,
    ])
}

/// Leave travel allowance exemption, capped at a multiple of basic salary.
pub fn lta_exemption(
    leave_travel_allowance: Decimal,
    basic_salary: Decimal,
    limits: &ExemptionLimits,
) -> Decimal {
    bounded_exemption([
        leave_travel_allowance,
        basic_salary * limits.lta_basic_multiple,
    ])
}

/// Conveyance allowance exemption, capped at a fixed annual amount.
pub fn conveyance_exemption(
    conveyance_allowance: Decimal,
    limits: &ExemptionLimits,
) -> Decimal {
    bounded_exemption([conveyance_allowance, limits.conveyance_cap])
}

/// Food card exemption, capped at a fixed annual amount.
pub fn food_card_exemption(
    food_card_reimbursement: Decimal,
    limits: &ExemptionLimits,
) -> Decimal {
    bounded_exemption([food_card_reimbursement, limits.food_card_cap])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::TaxYearConfig;

    fn limits() -> ExemptionLimits {
        TaxYearConfig::fy_2024_25().exemptions
    }

    // =========================================================================
    // hra_exemption tests
    // =========================================================================

    #[test]
    fn hra_exemption_is_zero_without_allowance() {
        let housing = HousingDetails {
            actual_rent_paid: dec!(300000),
            metro_city: true,
        };

        let result = hra_exemption(dec!(600000), dec!(0), &housing, &limits());

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn hra_exemption_is_zero_when_no_rent_paid() {
        let result = hra_exemption(
            dec!(600000),
            dec!(300000),
            &HousingDetails::default(),
            &limits(),
        );

        // Candidates: 300000, max(0, 0 - 60000) = 0, 600000 * 0.4 = 240000
        assert_eq!(result, dec!(0));
    }

    #[test]
    fn hra_exemption_limited_by_rent_over_offset() {
        let housing = HousingDetails {
            actual_rent_paid: dec!(240000),
            metro_city: false,
        };

        let result = hra_exemption(dec!(600000), dec!(300000), &housing, &limits());

        // Candidates: 300000, 240000 - 60000 = 180000, 240000
        assert_eq!(result, dec!(180000));
    }

    #[test]
    fn hra_exemption_limited_by_non_metro_share_of_basic() {
        let housing = HousingDetails {
            actual_rent_paid: dec!(500000),
            metro_city: false,
        };

        let result = hra_exemption(dec!(600000), dec!(300000), &housing, &limits());

        // Candidates: 300000, 440000, 240000
        assert_eq!(result, dec!(240000));
    }

    #[test]
    fn hra_exemption_metro_uses_half_of_basic() {
        let housing = HousingDetails {
            actual_rent_paid: dec!(500000),
            metro_city: true,
        };

        let result = hra_exemption(dec!(500000), dec!(300000), &housing, &limits());

        // Candidates: 300000, 450000, 250000
        assert_eq!(result, dec!(250000));
    }

    #[test]
    fn hra_exemption_limited_by_allowance() {
        let housing = HousingDetails {
            actual_rent_paid: dec!(500000),
            metro_city: true,
        };

        let result = hra_exemption(dec!(600000), dec!(120000), &housing, &limits());

        assert_eq!(result, dec!(120000));
    }

    // =========================================================================
    // lta / conveyance / food card tests
    // =========================================================================

    #[test]
    fn lta_exemption_limited_by_allowance() {
        let result = lta_exemption(dec!(50000), dec!(600000), &limits());

        assert_eq!(result, dec!(50000));
    }

    #[test]
    fn lta_exemption_limited_by_twice_basic() {
        let result = lta_exemption(dec!(50000), dec!(10000), &limits());

        assert_eq!(result, dec!(20000));
    }

    #[test]
    fn conveyance_exemption_capped() {
        assert_eq!(conveyance_exemption(dec!(30000), &limits()), dec!(19200));
        assert_eq!(conveyance_exemption(dec!(12000), &limits()), dec!(12000));
    }

    #[test]
    fn food_card_exemption_capped() {
        assert_eq!(food_card_exemption(dec!(40000), &limits()), dec!(26400));
        assert_eq!(food_card_exemption(dec!(26400), &limits()), dec!(26400));
    }

    #[test]
    fn negative_allowance_grants_nothing() {
        assert_eq!(conveyance_exemption(dec!(-500), &limits()), dec!(0));
    }
}
