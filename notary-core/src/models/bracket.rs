//! Bracket tables for the acquisition tax, registry fee and notary fee.
//!
//! A [`BracketTable`] is a piecewise function over the value of the
//! property. Published tables list an inclusive `[lower, upper]` range per
//! bracket, with the next bracket starting one cent above the previous upper
//! bound. Lookup selects the rightmost bracket whose lower bound does not
//! exceed the value, so a value sitting exactly on an upper bound stays in
//! that bracket and any value in the one-cent gap is also absorbed by the
//! lower bracket.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::round_half_up;

/// Errors raised when a table does not partition `[first_lower, +inf)`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table '{0}' has no brackets")]
    Empty(String),

    #[error("bracket {index} has upper bound {upper} below its lower bound {lower}")]
    InvertedBracket {
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("bracket {index} is open-ended but is not the last bracket")]
    OpenBracketNotLast { index: usize },

    #[error("last bracket must be open-ended, found upper bound {0}")]
    BoundedLastBracket(Decimal),

    #[error("bracket {index} starts at {lower}, not above the previous upper bound {previous_upper}")]
    Overlapping {
        index: usize,
        lower: Decimal,
        previous_upper: Decimal,
    },
}

/// How a bracket turns a value into an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountRule {
    /// `base_amount + (value - lower_bound) * marginal_rate`
    Marginal,
    /// `base_amount` only; the rate column is ignored.
    Flat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub lower_bound: Decimal,
    /// `None` for the last, open-ended bracket.
    pub upper_bound: Option<Decimal>,
    pub base_amount: Decimal,
    pub marginal_rate: Decimal,
}

impl Bracket {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        base_amount: Decimal,
        marginal_rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            base_amount,
            marginal_rate,
        }
    }
}

/// An immutable, validated, ascending sequence of brackets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    edition: String,
    rule: AmountRule,
    brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Builds a table, checking that the brackets are sorted, do not overlap
    /// and end with an open bracket.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] describing the first broken bracket.
    pub fn new(
        edition: impl Into<String>,
        rule: AmountRule,
        brackets: Vec<Bracket>,
    ) -> Result<Self, BracketTableError> {
        let table = Self::new_unchecked(edition, rule, brackets);
        table.validate()?;
        Ok(table)
    }

    /// Builds a table from compiled-in preset data. The presets are covered
    /// by tests that call [`BracketTable::validate`].
    pub(crate) fn new_unchecked(
        edition: impl Into<String>,
        rule: AmountRule,
        brackets: Vec<Bracket>,
    ) -> Self {
        Self {
            edition: edition.into(),
            rule,
            brackets,
        }
    }

    pub fn validate(&self) -> Result<(), BracketTableError> {
        let Some(last_index) = self.brackets.len().checked_sub(1) else {
            return Err(BracketTableError::Empty(self.edition.clone()));
        };

        for (index, bracket) in self.brackets.iter().enumerate() {
            match bracket.upper_bound {
                Some(upper) if upper < bracket.lower_bound => {
                    return Err(BracketTableError::InvertedBracket {
                        index,
                        lower: bracket.lower_bound,
                        upper,
                    });
                }
                Some(upper) if index == last_index => {
                    return Err(BracketTableError::BoundedLastBracket(upper));
                }
                None if index != last_index => {
                    return Err(BracketTableError::OpenBracketNotLast { index });
                }
                _ => {}
            }
        }

        for (index, pair) in self.brackets.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            // Checked above: every bracket but the last has an upper bound.
            let previous_upper = previous.upper_bound.unwrap_or(Decimal::MAX);
            if current.lower_bound <= previous_upper {
                return Err(BracketTableError::Overlapping {
                    index: index + 1,
                    lower: current.lower_bound,
                    previous_upper,
                });
            }
        }

        Ok(())
    }

    pub fn edition(&self) -> &str {
        &self.edition
    }

    pub fn rule(&self) -> AmountRule {
        self.rule
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Smallest value that falls into any bracket.
    pub fn first_lower_bound(&self) -> Option<Decimal> {
        self.brackets.first().map(|b| b.lower_bound)
    }

    /// Finds the bracket containing `value`, or `None` when the value is
    /// below the first lower bound.
    pub fn lookup(
        &self,
        value: Decimal,
    ) -> Option<&Bracket> {
        let index = self.brackets.partition_point(|b| b.lower_bound <= value);
        index.checked_sub(1).map(|i| &self.brackets[i])
    }

    /// Amount owed for `value`, rounded to cents. Zero below the first bracket.
    pub fn amount(
        &self,
        value: Decimal,
    ) -> Decimal {
        let Some(bracket) = self.lookup(value) else {
            return Decimal::ZERO;
        };

        let raw = match self.rule {
            AmountRule::Marginal => {
                bracket.base_amount + (value - bracket.lower_bound) * bracket.marginal_rate
            }
            AmountRule::Flat => bracket.base_amount,
        };

        round_half_up(raw)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn marginal_table() -> BracketTable {
        BracketTable::new(
            "test",
            AmountRule::Marginal,
            vec![
                Bracket::new(dec!(0.12), Some(dec!(1000.00)), dec!(10.00), dec!(0.01)),
                Bracket::new(dec!(1000.01), Some(dec!(5000.00)), dec!(25.00), dec!(0.02)),
                Bracket::new(dec!(5000.01), None, dec!(110.00), dec!(0.03)),
            ],
        )
        .unwrap()
    }

    fn flat_table() -> BracketTable {
        BracketTable::new(
            "test-flat",
            AmountRule::Flat,
            vec![
                Bracket::new(dec!(0.01), Some(dec!(1000.00)), dec!(100.00), dec!(0.5)),
                Bracket::new(dec!(1000.01), None, dec!(300.00), dec!(0.5)),
            ],
        )
        .unwrap()
    }

    // =========================================================================
    // validation tests
    // =========================================================================

    #[test]
    fn new_rejects_empty_table() {
        let result = BracketTable::new("empty", AmountRule::Marginal, vec![]);

        assert_eq!(result, Err(BracketTableError::Empty("empty".to_string())));
    }

    #[test]
    fn new_rejects_inverted_bracket() {
        let result = BracketTable::new(
            "bad",
            AmountRule::Marginal,
            vec![
                Bracket::new(dec!(100), Some(dec!(50)), dec!(0), dec!(0)),
                Bracket::new(dec!(100.01), None, dec!(0), dec!(0)),
            ],
        );

        assert_eq!(
            result,
            Err(BracketTableError::InvertedBracket {
                index: 0,
                lower: dec!(100),
                upper: dec!(50),
            })
        );
    }

    #[test]
    fn new_rejects_open_bracket_in_the_middle() {
        let result = BracketTable::new(
            "bad",
            AmountRule::Marginal,
            vec![
                Bracket::new(dec!(0), None, dec!(0), dec!(0)),
                Bracket::new(dec!(100), None, dec!(0), dec!(0)),
            ],
        );

        assert_eq!(result, Err(BracketTableError::OpenBracketNotLast { index: 0 }));
    }

    #[test]
    fn new_rejects_bounded_last_bracket() {
        let result = BracketTable::new(
            "bad",
            AmountRule::Marginal,
            vec![Bracket::new(dec!(0), Some(dec!(100)), dec!(0), dec!(0))],
        );

        assert_eq!(result, Err(BracketTableError::BoundedLastBracket(dec!(100))));
    }

    #[test]
    fn new_rejects_overlapping_brackets() {
        let result = BracketTable::new(
            "bad",
            AmountRule::Marginal,
            vec![
                Bracket::new(dec!(0), Some(dec!(100)), dec!(0), dec!(0)),
                Bracket::new(dec!(100), None, dec!(0), dec!(0)),
            ],
        );

        assert_eq!(
            result,
            Err(BracketTableError::Overlapping {
                index: 1,
                lower: dec!(100),
                previous_upper: dec!(100),
            })
        );
    }

    // =========================================================================
    // lookup tests
    // =========================================================================

    #[test]
    fn lookup_returns_none_below_first_bracket() {
        let table = marginal_table();

        assert_eq!(table.lookup(dec!(0)), None);
        assert_eq!(table.lookup(dec!(0.11)), None);
    }

    #[test]
    fn lookup_includes_first_lower_bound() {
        let table = marginal_table();

        let bracket = table.lookup(dec!(0.12)).unwrap();

        assert_eq!(bracket.lower_bound, dec!(0.12));
    }

    #[test]
    fn lookup_keeps_upper_bound_in_lower_bracket() {
        let table = marginal_table();

        let bracket = table.lookup(dec!(1000.00)).unwrap();

        assert_eq!(bracket.lower_bound, dec!(0.12));
    }

    #[test]
    fn lookup_moves_to_next_bracket_one_cent_later() {
        let table = marginal_table();

        let bracket = table.lookup(dec!(1000.01)).unwrap();

        assert_eq!(bracket.lower_bound, dec!(1000.01));
    }

    #[test]
    fn lookup_absorbs_sub_cent_gap_into_lower_bracket() {
        let table = marginal_table();

        let bracket = table.lookup(dec!(1000.005)).unwrap();

        assert_eq!(bracket.lower_bound, dec!(0.12));
    }

    #[test]
    fn lookup_open_bracket_covers_large_values() {
        let table = marginal_table();

        let bracket = table.lookup(dec!(999999999)).unwrap();

        assert_eq!(bracket.upper_bound, None);
    }

    #[test]
    fn lookup_selects_exactly_one_bracket_for_every_sample() {
        let table = marginal_table();

        for value in [dec!(0.12), dec!(500), dec!(1000), dec!(1000.01), dec!(4999.99), dec!(5000.01)] {
            let matches = table
                .brackets()
                .iter()
                .filter(|b| {
                    b.lower_bound <= value && b.upper_bound.is_none_or(|upper| value <= upper)
                })
                .count();
            assert_eq!(matches, 1, "value {value}");
            assert!(table.lookup(value).is_some());
        }
    }

    // =========================================================================
    // amount tests
    // =========================================================================

    #[test]
    fn amount_is_zero_below_first_bracket() {
        let table = marginal_table();

        assert_eq!(table.amount(dec!(0)), dec!(0));
    }

    #[test]
    fn amount_applies_marginal_rate_over_lower_bound() {
        let table = marginal_table();

        // 25.00 + (2000.01 - 1000.01) * 0.02 = 45.00
        assert_eq!(table.amount(dec!(2000.01)), dec!(45.00));
    }

    #[test]
    fn amount_rounds_to_cents() {
        let table = marginal_table();

        // 10.00 + (100.125 - 0.12) * 0.01 = 11.00005
        assert_eq!(table.amount(dec!(100.125)), dec!(11.00));
    }

    #[test]
    fn amount_ignores_rate_for_flat_tables() {
        let table = flat_table();

        assert_eq!(table.amount(dec!(999.99)), dec!(100.00));
        assert_eq!(table.amount(dec!(5000)), dec!(300.00));
    }

    #[test]
    fn amount_flat_table_is_zero_for_zero_value() {
        let table = flat_table();

        assert_eq!(table.amount(dec!(0)), dec!(0));
    }
}
