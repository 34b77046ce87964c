//! Common utility functions for fee calculations.
//!
//! Every amount is rounded to cents where it is computed, so totals are sums
//! of already-rounded figures.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use notary_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Reduces `amount` by a forgiveness fraction and rounds to cents.
///
/// ```
/// use rust_decimal_macros::dec;
/// use notary_core::calculations::common::apply_forgiveness;
///
/// assert_eq!(apply_forgiveness(dec!(1706.97), dec!(0.60)), dec!(682.79));
/// ```
pub fn apply_forgiveness(
    amount: Decimal,
    fraction: Decimal,
) -> Decimal {
    round_half_up(amount * (Decimal::ONE - fraction))
}

/// Converts a fraction (`0.60`) into a percentage (`60`), without trailing zeros.
pub fn to_percent(fraction: Decimal) -> Decimal {
    (fraction * Decimal::ONE_HUNDRED).normalize()
}
