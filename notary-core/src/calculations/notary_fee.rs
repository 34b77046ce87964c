//! Notary fee ("honorarios") and its VAT.
//!
//! The fee is the notary-fee bracket amount for the operation value,
//! surcharged by [`crate::rates::NOTARY_FEE_MARKUP`]. The markup is a policy
//! knob carried in [`crate::FeePolicy`] so it can change without touching
//! the bracket lookup.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::models::BracketTable;

/// Notary fee for `operation_value`: rounded bracket amount times
/// `1 + markup`, rounded again.
///
/// The bracket amount is deliberately rounded on its own, like every other
/// computed amount, before the markup is applied. This can differ by one
/// cent from a single rounding of the raw amount: at 5,000,000 the raw
/// bracket amount is 62332.8063222, giving 73552.72 here against 73552.71
/// with one rounding.
///
/// ```
/// use rust_decimal_macros::dec;
/// use notary_core::calculations::notary_fee;
/// use notary_core::rates::{NOTARY_FEE_MARKUP, presets};
///
/// let table = presets::notary_fee();
///
/// assert_eq!(notary_fee(&table, dec!(100000), NOTARY_FEE_MARKUP), dec!(7825.76));
/// assert_eq!(notary_fee(&table, dec!(100000), dec!(0)), dec!(6632.00));
/// ```
pub fn notary_fee(
    table: &BracketTable,
    operation_value: Decimal,
    markup: Decimal,
) -> Decimal {
    let base = table.amount(operation_value);
    round_half_up(base * (Decimal::ONE + markup))
}

/// VAT on an amount, rounded to cents.
pub fn vat(
    amount: Decimal,
    rate: Decimal,
) -> Decimal {
    round_half_up(amount * rate)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::rates::{NOTARY_FEE_MARKUP, VAT_RATE, presets};

    #[test]
    fn notary_fee_applies_markup_to_rounded_base() {
        let table = presets::notary_fee();

        // 62332.81 * 1.18 = 73552.7158
        let result = notary_fee(&table, dec!(5000000), NOTARY_FEE_MARKUP);

        assert_eq!(result, dec!(73552.72));
    }

    #[test]
    fn notary_fee_fifth_bracket() {
        let table = presets::notary_fee();

        // 34642.18 * 1.18 = 40877.7724
        let result = notary_fee(&table, dec!(2000000), NOTARY_FEE_MARKUP);

        assert_eq!(result, dec!(40877.77));
    }

    #[test]
    fn notary_fee_rounds_base_before_markup() {
        let table = presets::notary_fee();
        let bracket = &table.brackets()[5];
        // 54482 + (5000000 - 3641729.01) * 0.00578 = 62332.8063222
        let raw = bracket.base_amount + (dec!(5000000) - bracket.lower_bound) * bracket.marginal_rate;

        let result = notary_fee(&table, dec!(5000000), NOTARY_FEE_MARKUP);

        assert_eq!(round_half_up(raw * dec!(1.18)), dec!(73552.71));
        assert_eq!(result, dec!(73552.72));
    }

    #[test]
    fn notary_fee_is_zero_for_zero_value() {
        let table = presets::notary_fee();

        let result = notary_fee(&table, dec!(0), NOTARY_FEE_MARKUP);

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn vat_is_sixteen_percent() {
        let result = vat(dec!(7825.76), VAT_RATE);

        // 7825.76 * 0.16 = 1252.1216
        assert_eq!(result, dec!(1252.12));
    }
}
