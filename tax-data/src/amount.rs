//! Lenient parsing of user-entered amounts.
//!
//! Salary figures arrive as free text from forms, spreadsheets and config
//! files. Anything that does not start with a number is treated as zero, and
//! a number followed by trailing junk keeps its numeric prefix (`"1200abc"` is
//! 1200). Commas are taken as thousands separators in either the Western
//! (`1,500,000`) or Indian (`15,00,000`) grouping.
//!
//! Amounts beyond [`MAX_AMOUNT_RUPEES`] in either direction are treated as
//! zero, so downstream arithmetic always has headroom.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserializer;
use serde::de::{self, Visitor};
use tracing::warn;

/// Largest magnitude accepted for a single amount (₹10^15).
pub const MAX_AMOUNT_RUPEES: i64 = 1_000_000_000_000_000;

static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?)(\d*)(?:\.(\d*))?(?:[eE]([+-]?\d+))?")
        .expect("numeric prefix pattern is valid")
});

/// Parses the leading number of `input`, or zero if there is none.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_data::parse_amount;
///
/// assert_eq!(parse_amount("15,00,000"), dec!(1500000));
/// assert_eq!(parse_amount(" 2400.50 "), dec!(2400.50));
/// assert_eq!(parse_amount("19200 per year"), dec!(19200));
/// assert_eq!(parse_amount("n/a"), dec!(0));
/// assert_eq!(parse_amount(""), dec!(0));
/// ```
pub fn parse_amount(input: &str) -> Decimal {
    let normalized = input.trim().replace(',', "");
    if normalized.is_empty() {
        return Decimal::ZERO;
    }

    let Some(value) = numeric_prefix(&normalized) else {
        warn!(input, "non-numeric amount treated as 0");
        return Decimal::ZERO;
    };

    checked(value)
}

/// Parses a yes/no style flag. Anything unrecognised is `false`.
pub fn parse_flag(input: &str) -> bool {
    matches!(
        input.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "metro"
    )
}

fn numeric_prefix(s: &str) -> Option<Decimal> {
    let caps = NUMERIC_PREFIX.captures(s)?;
    let sign = caps.get(1).map_or("", |m| m.as_str());
    let whole = caps.get(2).map_or("", |m| m.as_str());
    let fraction = caps.get(3).map_or("", |m| m.as_str());

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut mantissa = format!("{sign}{}", if whole.is_empty() { "0" } else { whole });
    if !fraction.is_empty() {
        mantissa.push('.');
        mantissa.push_str(fraction);
    }

    let parsed = match caps.get(4) {
        Some(exponent) => {
            let exponent = exponent.as_str().trim_start_matches('+');
            Decimal::from_scientific(&format!("{mantissa}e{exponent}"))
        }
        None => mantissa.parse::<Decimal>(),
    };

    match parsed {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(input = s, %error, "amount out of range treated as 0");
            Some(Decimal::ZERO)
        }
    }
}

fn checked(value: Decimal) -> Decimal {
    if value.abs() > Decimal::from(MAX_AMOUNT_RUPEES) {
        warn!(%value, "amount out of range treated as 0");
        return Decimal::ZERO;
    }
    if value.is_sign_negative() && !value.is_zero() {
        warn!(%value, "negative amount passed through unchanged");
    }
    value
}

/// Serde adapter applying [`parse_amount`] to whatever scalar the format
/// provides (string, integer, float, bool or nothing).
///
/// Use with `#[serde(default, deserialize_with = "tax_data::amount::lenient")]`.
pub fn lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(AmountVisitor)
}

/// Serde adapter applying [`parse_flag`].
pub fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(FlagVisitor)
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Decimal;

    fn expecting(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str("an amount")
    }

    fn visit_str<E: de::Error>(
        self,
        v: &str,
    ) -> Result<Decimal, E> {
        Ok(parse_amount(v))
    }

    fn visit_i64<E: de::Error>(
        self,
        v: i64,
    ) -> Result<Decimal, E> {
        Ok(checked(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(
        self,
        v: u64,
    ) -> Result<Decimal, E> {
        Ok(checked(Decimal::from(v)))
    }

    fn visit_i128<E: de::Error>(
        self,
        v: i128,
    ) -> Result<Decimal, E> {
        match Decimal::try_from_i128_with_scale(v, 0) {
            Ok(value) => Ok(checked(value)),
            Err(error) => {
                warn!(value = %v, %error, "amount out of range treated as 0");
                Ok(Decimal::ZERO)
            }
        }
    }

    fn visit_u128<E: de::Error>(
        self,
        v: u128,
    ) -> Result<Decimal, E> {
        match i128::try_from(v) {
            Ok(v) => self.visit_i128(v),
            Err(_) => {
                warn!(value = %v, "amount out of range treated as 0");
                Ok(Decimal::ZERO)
            }
        }
    }

    fn visit_f64<E: de::Error>(
        self,
        v: f64,
    ) -> Result<Decimal, E> {
        // Display gives the shortest decimal that round-trips, without exponent.
        Ok(parse_amount(&v.to_string()))
    }

    fn visit_bool<E: de::Error>(
        self,
        v: bool,
    ) -> Result<Decimal, E> {
        warn!(value = v, "boolean amount treated as 0");
        Ok(Decimal::ZERO)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Decimal, D::Error> {
        deserializer.deserialize_any(self)
    }
}

struct FlagVisitor;

impl<'de> Visitor<'de> for FlagVisitor {
    type Value = bool;

    fn expecting(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str("a yes/no flag")
    }

    fn visit_bool<E: de::Error>(
        self,
        v: bool,
    ) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_str<E: de::Error>(
        self,
        v: &str,
    ) -> Result<bool, E> {
        Ok(parse_flag(v))
    }

    fn visit_i64<E: de::Error>(
        self,
        v: i64,
    ) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_u64<E: de::Error>(
        self,
        v: u64,
    ) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_f64<E: de::Error>(
        self,
        v: f64,
    ) -> Result<bool, E> {
        Ok(v != 0.0)
    }

    fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
        Ok(false)
    }

    fn visit_none<E: de::Error>(self) -> Result<bool, E> {
        Ok(false)
    }

    fn visit_some<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<bool, D::Error> {
        deserializer.deserialize_any(self)
    }
}
