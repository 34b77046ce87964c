//! Aggregation of every cost concept into one report.
//!
//! # Concepts
//!
//! | Concept               | Base                         | Forgiveness applied |
//! |-----------------------|------------------------------|---------------------|
//! | Acquisition tax       | cadastral value when forgiven, else operation value | yes |
//! | Registry fee          | same as acquisition tax      | yes                 |
//! | Notary fee            | operation value              | no                  |
//! | VAT                   | 16% of the notary fee        | no                  |
//! | Disbursement          | fixed                        | no                  |
//! | Appraisal fee         | same as acquisition tax, 1.95‰ + VAT | charged only at qualifying fractions |
//!
//! When the forgiveness fraction is exactly the dual-total fraction (10%),
//! the report also carries the unforgiven tax and registry fee and a second
//! total built from them.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use notary_core::{CalculationInput, FeeCalculator, OperationType, RateSchedule, TotalKind};
//!
//! let calculator = FeeCalculator::new(RateSchedule::canonical());
//! let input = CalculationInput::new(dec!(5000000), None, OperationType::Inheritance);
//!
//! let result = calculator.calculate(&input);
//!
//! assert_eq!(result.forgiveness_percent, None);
//! assert_eq!(result.total(TotalKind::General).unwrap().amount, dec!(405299.25));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::{apply_forgiveness, round_half_up, to_percent};
use crate::calculations::notary_fee::{notary_fee, vat};
use crate::models::{CalculationInput, CalculationResult, Concept, LineItem, Total, TotalKind};
use crate::rates::RateSchedule;

/// Calculator over a borrowed, read-only rate schedule.
#[derive(Debug, Clone, Copy)]
pub struct FeeCalculator<'a> {
    rates: &'a RateSchedule,
}

impl<'a> FeeCalculator<'a> {
    pub fn new(rates: &'a RateSchedule) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &'a RateSchedule {
        self.rates
    }

    /// Builds the full cost report for one transaction.
    ///
    /// Inputs are assumed to be non-negative; see
    /// [`CalculationInput::validate`].
    pub fn calculate(
        &self,
        input: &CalculationInput,
    ) -> CalculationResult {
        let policy = &self.rates.policy;
        let fraction = self.forgiveness_fraction(input);

        let notary_fee = notary_fee(
            &self.rates.notary_fee,
            input.operation_value,
            policy.notary_markup,
        );
        let vat = vat(notary_fee, policy.vat_rate);
        let disbursement = round_half_up(policy.disbursement);
        let appraisal_fee = self.appraisal_fee(self.taxable_base(input, fraction), fraction);

        let mut line_items = Vec::with_capacity(8);
        let mut totals = Vec::with_capacity(2);

        if fraction > Decimal::ZERO {
            let cadastral_value = input.effective_cadastral_value();
            line_items.push(LineItem::new(
                Concept::AcquisitionTax,
                self.acquisition_tax(cadastral_value, fraction),
            ));
            line_items.push(LineItem::new(
                Concept::RegistryFee,
                self.registry_fee(cadastral_value, fraction),
            ));

            if policy.reports_dual_total(fraction) {
                line_items.push(LineItem::new(
                    Concept::AcquisitionTaxWithoutForgiveness,
                    self.acquisition_tax(input.operation_value, Decimal::ZERO),
                ));
                line_items.push(LineItem::new(
                    Concept::RegistryFeeWithoutForgiveness,
                    self.registry_fee(input.operation_value, Decimal::ZERO),
                ));
            }
        } else {
            line_items.push(LineItem::new(
                Concept::AcquisitionTax,
                self.acquisition_tax(input.operation_value, Decimal::ZERO),
            ));
            line_items.push(LineItem::new(
                Concept::RegistryFee,
                self.registry_fee(input.operation_value, Decimal::ZERO),
            ));
        }

        line_items.push(LineItem::new(Concept::NotaryFee, notary_fee));
        line_items.push(LineItem::new(Concept::Vat, vat));
        line_items.push(LineItem::new(Concept::Disbursement, disbursement));
        line_items.push(LineItem::new(Concept::AppraisalFee, appraisal_fee));

        let mut result = CalculationResult {
            line_items,
            totals: Vec::new(),
            forgiveness_percent: (fraction > Decimal::ZERO).then(|| to_percent(fraction)),
        };

        let kinds: &[TotalKind] = if fraction == Decimal::ZERO {
            &[TotalKind::General]
        } else if policy.reports_dual_total(fraction) {
            &[TotalKind::WithForgiveness, TotalKind::WithoutForgiveness]
        } else {
            &[TotalKind::WithForgiveness]
        };
        for kind in kinds {
            totals.push(Total::new(*kind, result.sum_of_components(*kind)));
        }
        result.totals = totals;

        result
    }

    /// Forgiveness fraction for the input's cadastral value and operation type.
    pub fn forgiveness_fraction(
        &self,
        input: &CalculationInput,
    ) -> Decimal {
        self.rates
            .forgiveness
            .fraction_for(input.effective_cadastral_value(), input.operation_type)
    }

    /// Value the forgiven concepts are computed on: the cadastral value when
    /// a forgiveness applies, the operation value otherwise.
    fn taxable_base(
        &self,
        input: &CalculationInput,
        fraction: Decimal,
    ) -> Decimal {
        if fraction > Decimal::ZERO {
            input.effective_cadastral_value()
        } else {
            input.operation_value
        }
    }

    fn acquisition_tax(
        &self,
        base: Decimal,
        fraction: Decimal,
    ) -> Decimal {
        apply_forgiveness(self.rates.acquisition_tax.amount(base), fraction)
    }

    fn registry_fee(
        &self,
        base: Decimal,
        fraction: Decimal,
    ) -> Decimal {
        apply_forgiveness(self.rates.registry_fee.amount(base), fraction)
    }

    /// Appraisal fee, or zero when the fraction does not qualify.
    fn appraisal_fee(
        &self,
        base: Decimal,
        fraction: Decimal,
    ) -> Decimal {
        let policy = &self.rates.policy;
        if !policy.charges_appraisal(fraction) {
            return Decimal::ZERO;
        }
        round_half_up(
            base * policy.appraisal_rate * (Decimal::ONE + policy.appraisal_vat_rate),
        )
    }
}

/// Calculates against the canonical rate schedule from raw inputs.
///
/// An unrecognised `operation_code` is treated as "no forgiveness".
///
/// ```
/// use rust_decimal_macros::dec;
/// use notary_core::calculate_total;
///
/// let result = calculate_total(dec!(100000), Some(dec!(100000)), "adquisicion");
///
/// assert_eq!(result.forgiveness_percent, Some(dec!(60)));
/// ```
pub fn calculate_total(
    operation_value: Decimal,
    cadastral_value: Option<Decimal>,
    operation_code: &str,
) -> CalculationResult {
    let input = CalculationInput::from_code(operation_value, cadastral_value, operation_code);
    FeeCalculator::new(RateSchedule::canonical()).calculate(&input)
}
