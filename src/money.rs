//! Monetary rounding shared by validation and reporting.
//!
//! Every figure rounded by this service goes through [`round_cents`], which
//! rounds half away from zero to two fractional digits.

use rust_decimal::{prelude::FromPrimitive, Decimal, RoundingStrategy};

pub const CENT_DIGITS: u32 = 2;

pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENT_DIGITS, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a JSON number into a rounded amount. `None` for NaN or infinities.
///
/// The value has already passed through `f64`, so magnitudes beyond about
/// 2^53 carry binary noise (1e27 becomes `1000000000000000013287555072`).
/// Callers bound the accepted range before storing.
pub fn cents_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).map(round_cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_cents(dec("2.345")), dec("2.35"));
        assert_eq!(round_cents(dec("2.344")), dec("2.34"));
        assert_eq!(round_cents(dec("-2.345")), dec("-2.35"));
    }

    #[test]
    fn converts_floats() {
        assert_eq!(cents_from_f64(19.999), Some(dec("20.00")));
        assert_eq!(cents_from_f64(0.1), Some(dec("0.10")));
        assert_eq!(cents_from_f64(f64::NAN), None);
        assert_eq!(cents_from_f64(f64::INFINITY), None);
    }
}
