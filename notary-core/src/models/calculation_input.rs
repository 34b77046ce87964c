use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::OperationType;

/// Errors for inputs that must be rejected before calculating.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("operation value must be non-negative, got {0}")]
    NegativeOperationValue(Decimal),

    #[error("cadastral value must be non-negative, got {0}")]
    NegativeCadastralValue(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Transaction or appraisal value of the property.
    pub operation_value: Decimal,

    /// Government-assessed value. Falls back to `operation_value` when absent.
    pub cadastral_value: Option<Decimal>,

    /// `None` when the caller supplied a code that is not recognised; such
    /// inputs never qualify for forgiveness.
    pub operation_type: Option<OperationType>,
}

impl CalculationInput {
    pub fn new(
        operation_value: Decimal,
        cadastral_value: Option<Decimal>,
        operation_type: OperationType,
    ) -> Self {
        Self {
            operation_value,
            cadastral_value,
            operation_type: Some(operation_type),
        }
    }

    pub fn from_code(
        operation_value: Decimal,
        cadastral_value: Option<Decimal>,
        operation_code: &str,
    ) -> Self {
        Self {
            operation_value,
            cadastral_value,
            operation_type: OperationType::parse(operation_code),
        }
    }

    pub fn effective_cadastral_value(&self) -> Decimal {
        self.cadastral_value.unwrap_or(self.operation_value)
    }

    /// Boundary check for collaborators. The calculator itself assumes
    /// non-negative amounts.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.operation_value < Decimal::ZERO {
            return Err(InputError::NegativeOperationValue(self.operation_value));
        }
        if let Some(cadastral) = self.cadastral_value {
            if cadastral < Decimal::ZERO {
                return Err(InputError::NegativeCadastralValue(cadastral));
            }
        }
        Ok(())
    }
}
