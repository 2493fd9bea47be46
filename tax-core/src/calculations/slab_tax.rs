//! Marginal (progressive) tax over a [`SlabTable`].
//!
//! Each slab's rate applies only to the part of the income that falls inside
//! that slab. Upper bounds are exclusive, so an income sitting exactly on a
//! boundary is taxed entirely in the lower slab.

use rust_decimal::Decimal;

use crate::{BracketLine, SlabTable, TaxSlab};

/// Tax on `taxable_income` under `table`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{Regime, TaxYearConfig};
/// use tax_core::calculations::slab_tax::slab_tax;
///
/// let config = TaxYearConfig::fy_2024_25();
/// let slabs = &config.rules(Regime::New).slabs;
///
/// // 5% of 300000 + 10% of 300000 + 15% of 21200
/// assert_eq!(slab_tax(dec!(921200), slabs), dec!(48180));
/// ```
pub fn slab_tax(
    taxable_income: Decimal,
    table: &SlabTable,
) -> Decimal {
    table
        .iter()
        .filter_map(|slab| taxed_in_slab(taxable_income, slab))
        .map(|(_, tax)| tax)
        .sum()
}

/// Per-slab lines for `taxable_income`. Slabs the income does not reach are
/// left out; the lines' taxes sum to [`slab_tax`].
pub fn slab_lines(
    taxable_income: Decimal,
    table: &SlabTable,
) -> Vec<BracketLine> {
    table
        .iter()
        .filter_map(|slab| {
            taxed_in_slab(taxable_income, slab).map(|(taxed_amount, tax)| BracketLine {
                min_income: slab.min_income,
                max_income: slab.max_income,
                rate: slab.rate,
                taxed_amount,
                tax,
            })
        })
        .collect()
}

/// Amount of `income` inside `slab` and the tax on it, or `None` if the
/// income does not exceed the slab's lower bound.
fn taxed_in_slab(
    income: Decimal,
    slab: &TaxSlab,
) -> Option<(Decimal, Decimal)> {
    if income <= slab.min_income {
        return None;
    }

    let above_min = income - slab.min_income;
    let taxed = match slab.width() {
        Some(width) => above_min.min(width),
        None => above_min,
    };

    Some((taxed, taxed * slab.rate / Decimal::ONE_HUNDRED))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{Regime, TaxYearConfig};

    fn table(regime: Regime) -> SlabTable {
        TaxYearConfig::fy_2024_25().rules(regime).slabs.clone()
    }

    // =========================================================================
    // slab_tax tests
    // =========================================================================

    #[test]
    fn slab_tax_zero_income_is_zero() {
        for regime in Regime::ALL {
            assert_eq!(slab_tax(dec!(0), &table(regime)), dec!(0));
        }
    }

    #[test]
    fn slab_tax_negative_income_is_zero() {
        assert_eq!(slab_tax(dec!(-1000), &table(Regime::New)), dec!(0));
    }

    #[test]
    fn slab_tax_at_boundary_stays_in_lower_slab() {
        let new = table(Regime::New);

        assert_eq!(slab_tax(dec!(300000), &new), dec!(0));
        assert_eq!(slab_tax(dec!(300001), &new), dec!(0.05));
    }

    #[test]
    fn slab_tax_new_regime_across_slabs() {
        let new = table(Regime::New);

        assert_eq!(slab_tax(dec!(700000), &new), dec!(25000));
        assert_eq!(slab_tax(dec!(921200), &new), dec!(48180));
        // 15000 + 30000 + 45000 + 60000 + 30% of 500000
        assert_eq!(slab_tax(dec!(2000000), &new), dec!(300000));
    }

    #[test]
    fn slab_tax_old_regime_across_slabs() {
        let old = table(Regime::Old);

        assert_eq!(slab_tax(dec!(500000), &old), dec!(12500));
        // 12500 + 20% of 140600
        assert_eq!(slab_tax(dec!(640600), &old), dec!(40620));
        // 12500 + 100000 + 30% of 500000
        assert_eq!(slab_tax(dec!(1500000), &old), dec!(262500));
    }

    #[test]
    fn slab_tax_is_non_decreasing_across_boundaries() {
        for regime in Regime::ALL {
            let slabs = table(regime);
            let mut previous = Decimal::ZERO;
            let mut income = Decimal::ZERO;
            while income <= dec!(2500000) {
                let tax = slab_tax(income, &slabs);
                assert!(tax >= previous, "{regime}: tax fell at {income}");
                previous = tax;
                income += dec!(12500);
            }
        }
    }

    #[test]
    fn slab_tax_is_continuous_at_each_boundary() {
        let epsilon = dec!(0.01);
        for regime in Regime::ALL {
            let slabs = table(regime);
            for slab in slabs.iter().skip(1) {
                let below = slab_tax(slab.min_income - epsilon, &slabs);
                let at = slab_tax(slab.min_income, &slabs);
                let above = slab_tax(slab.min_income + epsilon, &slabs);
                // A one-paisa step can move the tax by at most rate% of a paisa.
                assert!(at - below <= epsilon, "{regime}: jump below {}", slab.min_income);
                assert!(above - at <= epsilon, "{regime}: jump above {}", slab.min_income);
            }
        }
    }

    // =========================================================================
    // slab_lines tests
    // =========================================================================

    #[test]
    fn slab_lines_skip_unreached_slabs() {
        let lines = slab_lines(dec!(921200), &table(Regime::New));

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3].min_income, dec!(900000));
        assert_eq!(lines[3].taxed_amount, dec!(21200));
        assert_eq!(lines[3].tax, dec!(3180));
    }

    #[test]
    fn slab_lines_sum_to_slab_tax() {
        for regime in Regime::ALL {
            let slabs = table(regime);
            for income in [dec!(0), dec!(250000), dec!(640600), dec!(921200), dec!(3000000)] {
                let total: Decimal = slab_lines(income, &slabs).iter().map(|l| l.tax).sum();
                assert_eq!(total, slab_tax(income, &slabs));
            }
        }
    }

    #[test]
    fn slab_lines_open_slab_taxes_remainder() {
        let lines = slab_lines(dec!(1600000), &table(Regime::New));
        let top = lines.last().unwrap();

        assert_eq!(top.max_income, None);
        assert_eq!(top.taxed_amount, dec!(100000));
        assert_eq!(top.tax, dec!(30000));
    }
}
