//! Compiled-in Mexico City tariff data.
//!
//! | Table            | Rule     | Brackets |
//! |------------------|----------|----------|
//! | Acquisition tax  | marginal | 8        |
//! | Registry fee     | flat     | 5        |
//! | Notary fee base  | marginal | 8        |
//!
//! The notary-fee table restarts from a zero base in its last bracket; the
//! published tariff is discontinuous there.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{AmountRule, Bracket, BracketTable, ForgivenessSchedule, ForgivenessTier};

/// Edition name of the compiled-in tables.
pub const CANONICAL_EDITION: &str = "cdmx-8";

type Row = (Decimal, Option<Decimal>, Decimal, Decimal);

const ACQUISITION_TAX: [Row; 8] = [
    (dec!(0.12), Some(dec!(123988.81)), dec!(314.97), dec!(0.01392)),
    (dec!(123988.82), Some(dec!(198382.03)), dec!(2040.90), dec!(0.02967)),
    (dec!(198382.04), Some(dec!(297572.76)), dec!(4248.16), dec!(0.03876)),
    (dec!(297572.77), Some(dec!(595145.67)), dec!(8092.80), dec!(0.04522)),
    (dec!(595145.68), Some(dec!(1487864.15)), dec!(21549.06), dec!(0.05023)),
    (dec!(1487864.16), Some(dec!(2975728.34)), dec!(66390.32), dec!(0.05487)),
    (dec!(2975728.35), Some(dec!(5732476.11)), dec!(148029.44), dec!(0.05952)),
    (dec!(5732476.12), None, dec!(312111.08), dec!(0.06183)),
];

const REGISTRY_FEE: [Row; 5] = [
    (dec!(0.01), Some(dec!(848550.00)), dec!(2411.00), dec!(0)),
    (dec!(848550.01), Some(dec!(1018260.00)), dec!(7233.00), dec!(0)),
    (dec!(1018260.01), Some(dec!(1187970.00)), dec!(12055.00), dec!(0)),
    (dec!(1187970.01), Some(dec!(1357680.00)), dec!(16877.00), dec!(0)),
    (dec!(1357680.01), None, dec!(24154.00), dec!(0)),
];

const NOTARY_FEE: [Row; 8] = [
    (dec!(0.01), Some(dec!(227607.00)), dec!(6632.00), dec!(0)),
    (dec!(227607.01), Some(dec!(455214.00)), dec!(9193.00), dec!(0.01125)),
    (dec!(455214.01), Some(dec!(910432.00)), dec!(13631.00), dec!(0.00975)),
    (dec!(910432.01), Some(dec!(1820862.00)), dec!(21142.00), dec!(0.00825)),
    (dec!(1820862.01), Some(dec!(3641729.00)), dec!(33433.00), dec!(0.00675)),
    (dec!(3641729.01), Some(dec!(7283459.00)), dec!(54482.00), dec!(0.00578)),
    (dec!(7283459.01), Some(dec!(14566923.00)), dec!(85073.00), dec!(0.00420)),
    (dec!(14566923.01), None, dec!(0), dec!(0.00327)),
];

const ACQUISITION_FORGIVENESS: [(Decimal, Decimal); 5] = [
    (dec!(448061.00), dec!(0.60)),
    (dec!(896120.00), dec!(0.40)),
    (dec!(1344180.00), dec!(0.30)),
    (dec!(1642105.00), dec!(0.20)),
    (dec!(2326313.00), dec!(0.10)),
];

const INHERITANCE_FORGIVENESS: [(Decimal, Decimal); 2] = [
    (dec!(2326313.00), dec!(0.80)),
    (dec!(2736839.00), dec!(0.40)),
];

fn table(
    rule: AmountRule,
    rows: &[Row],
) -> BracketTable {
    let brackets = rows
        .iter()
        .map(|&(lower, upper, base, rate)| Bracket::new(lower, upper, base, rate))
        .collect();
    BracketTable::new_unchecked(CANONICAL_EDITION, rule, brackets)
}

fn tiers(rows: &[(Decimal, Decimal)]) -> Vec<ForgivenessTier> {
    rows.iter()
        .map(|&(ceiling, fraction)| ForgivenessTier::new(ceiling, fraction))
        .collect()
}

/// Acquisition tax (ISAI).
pub fn acquisition_tax() -> BracketTable {
    table(AmountRule::Marginal, &ACQUISITION_TAX)
}

/// Public registry fee; a flat amount per bracket.
pub fn registry_fee() -> BracketTable {
    table(AmountRule::Flat, &REGISTRY_FEE)
}

/// Notary fee before the markup.
pub fn notary_fee() -> BracketTable {
    table(AmountRule::Marginal, &NOTARY_FEE)
}

pub fn forgiveness() -> ForgivenessSchedule {
    ForgivenessSchedule::new_unchecked(
        tiers(&ACQUISITION_FORGIVENESS),
        tiers(&INHERITANCE_FORGIVENESS),
    )
}
