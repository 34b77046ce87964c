use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::OperationType;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ForgivenessScheduleError {
    #[error("forgiveness fraction must be between 0 and 1, got {fraction} for ceiling {ceiling}")]
    InvalidFraction { ceiling: Decimal, fraction: Decimal },

    #[error("forgiveness ceiling must be non-negative, got {0}")]
    NegativeCeiling(Decimal),
}

/// Cadastral values up to and including `ceiling` qualify for `fraction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgivenessTier {
    pub ceiling: Decimal,
    pub fraction: Decimal,
}

impl ForgivenessTier {
    pub fn new(
        ceiling: Decimal,
        fraction: Decimal,
    ) -> Self {
        Self { ceiling, fraction }
    }
}

/// Per-operation forgiveness ("condonación") tiers, kept in ascending
/// ceiling order. The first tier whose ceiling is not exceeded wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForgivenessSchedule {
    acquisition: Vec<ForgivenessTier>,
    inheritance: Vec<ForgivenessTier>,
}

impl ForgivenessSchedule {
    /// # Errors
    ///
    /// Fails when a fraction lies outside `[0, 1]` or a ceiling is negative.
    pub fn new(
        acquisition: Vec<ForgivenessTier>,
        inheritance: Vec<ForgivenessTier>,
    ) -> Result<Self, ForgivenessScheduleError> {
        for tier in acquisition.iter().chain(&inheritance) {
            if tier.ceiling < Decimal::ZERO {
                return Err(ForgivenessScheduleError::NegativeCeiling(tier.ceiling));
            }
            if tier.fraction < Decimal::ZERO || tier.fraction > Decimal::ONE {
                return Err(ForgivenessScheduleError::InvalidFraction {
                    ceiling: tier.ceiling,
                    fraction: tier.fraction,
                });
            }
        }

        Ok(Self::new_unchecked(acquisition, inheritance))
    }

    pub(crate) fn new_unchecked(
        mut acquisition: Vec<ForgivenessTier>,
        mut inheritance: Vec<ForgivenessTier>,
    ) -> Self {
        // Stable sort: equal ceilings keep their source order.
        acquisition.sort_by(|a, b| a.ceiling.cmp(&b.ceiling));
        inheritance.sort_by(|a, b| a.ceiling.cmp(&b.ceiling));
        Self {
            acquisition,
            inheritance,
        }
    }

    /// A schedule that never forgives anything.
    pub fn none() -> Self {
        Self::new_unchecked(Vec::new(), Vec::new())
    }

    pub fn tiers(
        &self,
        operation_type: OperationType,
    ) -> &[ForgivenessTier] {
        match operation_type {
            OperationType::Acquisition => &self.acquisition,
            OperationType::Inheritance => &self.inheritance,
        }
    }

    /// Forgiveness fraction for a cadastral value, or zero when the value
    /// exceeds every ceiling.
    pub fn fraction(
        &self,
        cadastral_value: Decimal,
        operation_type: OperationType,
    ) -> Decimal {
        let tiers = self.tiers(operation_type);
        let index = tiers.partition_point(|t| t.ceiling < cadastral_value);
        tiers.get(index).map_or(Decimal::ZERO, |t| t.fraction)
    }

    /// Like [`ForgivenessSchedule::fraction`], but an absent operation type
    /// silently yields zero.
    pub fn fraction_for(
        &self,
        cadastral_value: Decimal,
        operation_type: Option<OperationType>,
    ) -> Decimal {
        operation_type.map_or(Decimal::ZERO, |op| self.fraction(cadastral_value, op))
    }

    /// Looks up by raw operation code. Unrecognised codes yield zero, not an
    /// error.
    pub fn fraction_for_code(
        &self,
        cadastral_value: Decimal,
        operation_code: &str,
    ) -> Decimal {
        self.fraction_for(cadastral_value, OperationType::parse(operation_code))
    }
}
