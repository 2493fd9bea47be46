//! Shared helpers for the income-tax calculations: rounding for display,
//! flooring, and the bounded-exemption rule used by the allowance exemptions.

use rust_decimal::Decimal;

/// Rounds to paise (two decimal places), half away from zero.
///
/// The engine itself never rounds; this is for reports that show amounts
/// derived from a 4% cess, which can carry a third decimal place.
///
/// # Arguments
///
/// * `value` - The decimal value to round
///
/// # Returns
///
/// The value rounded to two decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1927.204)), dec!(1927.20));
/// assert_eq!(round_half_up(dec!(1927.205)), dec!(1927.21));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Arguments
///
/// * `a` - First decimal value
/// * `b` - Second decimal value
///
/// # Returns
///
/// The larger of the two values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-60000), dec!(0)), dec!(0));
/// assert_eq!(max(dec!(921200), dec!(0)), dec!(921200));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the smallest of `candidates`, floored at zero.
///
/// Allowance exemptions are capped by several independent limits (the
/// allowance itself, a fixed annual cap, a share of basic salary, ...). The
/// exemption granted is the tightest of those limits and is never negative.
/// An empty candidate list grants nothing.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::bounded_exemption;
///
/// assert_eq!(bounded_exemption([dec!(300000), dec!(0), dec!(240000)]), dec!(0));
/// assert_eq!(bounded_exemption([dec!(50000), dec!(1200000)]), dec!(50000));
/// assert_eq!(bounded_exemption([dec!(19200), dec!(-5)]), dec!(0));
/// ```
pub fn bounded_exemption<I>(candidates: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    candidates
        .into_iter()
        .min()
        .map_or(Decimal::ZERO, |least| max(least, Decimal::ZERO))
}
