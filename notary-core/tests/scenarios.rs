//! End-to-end scenarios against the canonical rate schedule.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use notary_core::{
    CalculationInput, CalculationResult, Concept, FeeCalculator, OperationType, RateSchedule,
    TotalKind, calculate_total,
};

fn calculate(
    operation_value: Decimal,
    cadastral_value: Decimal,
    operation_type: OperationType,
) -> CalculationResult {
    let input = CalculationInput::new(operation_value, Some(cadastral_value), operation_type);
    FeeCalculator::new(RateSchedule::canonical()).calculate(&input)
}

/// Adds up the rounded line items a total is expected to cover, walking
/// `line_items` directly.
fn sum_line_items(
    result: &CalculationResult,
    kind: TotalKind,
) -> Decimal {
    result
        .line_items
        .iter()
        .filter(|item| match item.concept {
            Concept::AcquisitionTax | Concept::RegistryFee => kind != TotalKind::WithoutForgiveness,
            Concept::AcquisitionTaxWithoutForgiveness | Concept::RegistryFeeWithoutForgiveness => {
                kind == TotalKind::WithoutForgiveness
            }
            Concept::NotaryFee | Concept::Vat | Concept::Disbursement | Concept::AppraisalFee => true,
        })
        .map(|item| item.amount)
        .sum()
}

fn assert_totals_match_line_items(result: &CalculationResult) {
    assert!(!result.totals.is_empty());
    for total in &result.totals {
        assert_eq!(
            total.amount,
            sum_line_items(result, total.kind),
            "{} does not add up",
            total.label
        );
    }
}

#[test]
fn low_cadastral_acquisition_gets_sixty_percent_and_no_appraisal() {
    let result = calculate(dec!(100000), dec!(100000), OperationType::Acquisition);

    assert_eq!(result.forgiveness_percent, Some(dec!(60)));
    assert_eq!(result.amount_of(Concept::AppraisalFee), dec!(0));
    assert_eq!(result.total(TotalKind::WithForgiveness).map(|t| t.amount), Some(dec!(26725.07)));
    assert!(result.total(TotalKind::General).is_none());
    assert_totals_match_line_items(&result);
    // 682.79 + 964.40 + 7825.76 + 1252.12 + 16000.00 + 0
    assert_eq!(
        sum_line_items(&result, TotalKind::WithForgiveness),
        dec!(682.79) + dec!(964.40) + dec!(7825.76) + dec!(1252.12) + dec!(16000)
    );
}

#[test]
fn ten_percent_tier_reports_with_and_without_forgiveness() {
    let result = calculate(dec!(2000000), dec!(2000000), OperationType::Acquisition);

    assert_eq!(result.forgiveness_percent, Some(dec!(10)));
    assert_eq!(result.total(TotalKind::WithForgiveness).map(|t| t.amount), Some(dec!(174722.90)));
    assert_eq!(result.total(TotalKind::WithoutForgiveness).map(|t| t.amount), Some(dec!(186587.42)));
    assert_totals_match_line_items(&result);
}

#[test]
fn high_value_inheritance_gets_single_plain_total() {
    let result = calculate(dec!(5000000), dec!(5000000), OperationType::Inheritance);

    assert_eq!(result.forgiveness_percent, None);
    assert_eq!(result.totals.len(), 1);
    assert_eq!(result.totals[0].kind, TotalKind::General);
    assert_eq!(result.totals[0].label, "Total General");
    assert!(result.amount_of(Concept::AppraisalFee) > Decimal::ZERO);
    assert_totals_match_line_items(&result);
}

#[test]
fn zero_value_charges_only_disbursement() {
    let result = calculate(dec!(0), dec!(0), OperationType::Acquisition);

    for concept in [Concept::AcquisitionTax, Concept::RegistryFee, Concept::NotaryFee, Concept::Vat] {
        assert_eq!(result.amount_of(concept), dec!(0), "{concept:?}");
    }
    assert_eq!(result.amount_of(Concept::Disbursement), dec!(16000));
    assert_totals_match_line_items(&result);
}

#[test]
fn appraisal_fee_is_charged_exactly_at_qualifying_fractions() {
    let cases = [
        (dec!(300000), OperationType::Acquisition, Some(dec!(60)), false),
        (dec!(700000), OperationType::Acquisition, Some(dec!(40)), false),
        (dec!(1000000), OperationType::Acquisition, Some(dec!(30)), false),
        (dec!(1500000), OperationType::Acquisition, Some(dec!(20)), true),
        (dec!(2000000), OperationType::Acquisition, Some(dec!(10)), true),
        (dec!(3000000), OperationType::Acquisition, None, true),
        (dec!(2000000), OperationType::Inheritance, Some(dec!(80)), false),
        (dec!(2500000), OperationType::Inheritance, Some(dec!(40)), false),
    ];

    for (value, op, percent, charged) in cases {
        let result = calculate(value, value, op);

        assert_eq!(result.forgiveness_percent, percent, "{value} {op:?}");
        assert_eq!(
            result.amount_of(Concept::AppraisalFee) > Decimal::ZERO,
            charged,
            "{value} {op:?}"
        );
    }
}

#[test]
fn every_total_adds_up_across_a_value_sweep() {
    let mut value = dec!(0);
    while value <= dec!(20000000) {
        for op in [OperationType::Acquisition, OperationType::Inheritance] {
            let result = calculate(value, value, op);
            assert_totals_match_line_items(&result);
        }
        value += dec!(137911.37);
    }
}

#[test]
fn unknown_operation_code_is_silently_unforgiven() {
    let result = calculate_total(dec!(100000), Some(dec!(100000)), "donacion");

    assert_eq!(result.forgiveness_percent, None);
    assert_eq!(result.totals[0].kind, TotalKind::General);
}

#[test]
fn missing_cadastral_value_defaults_to_operation_value() {
    let explicit = calculate_total(dec!(800000), Some(dec!(800000)), "acquisition");
    let defaulted = calculate_total(dec!(800000), None, "acquisition");

    assert_eq!(explicit, defaulted);
}

#[test]
fn result_serializes_with_snake_case_kinds() {
    let result = calculate(dec!(2000000), dec!(2000000), OperationType::Acquisition);

    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["totals"][0]["kind"], "with_forgiveness");
    assert_eq!(json["totals"][1]["label"], "Total sin Condonación");
    assert_eq!(json["line_items"][0]["concept"], "acquisition_tax");
}
