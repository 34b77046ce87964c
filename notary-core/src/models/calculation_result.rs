use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A priced concept on the cost report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concept {
    AcquisitionTax,
    RegistryFee,
    /// Only reported alongside the 10% forgiveness tier.
    AcquisitionTaxWithoutForgiveness,
    /// Only reported alongside the 10% forgiveness tier.
    RegistryFeeWithoutForgiveness,
    NotaryFee,
    Vat,
    Disbursement,
    AppraisalFee,
}

impl Concept {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AcquisitionTax => "Impuesto Adquisición",
            Self::RegistryFee => "Derechos Registro",
            Self::AcquisitionTaxWithoutForgiveness => "Impuesto Adquisición sin Condonación",
            Self::RegistryFeeWithoutForgiveness => "Derechos Registro sin Condonación",
            Self::NotaryFee => "Honorarios",
            Self::Vat => "IVA",
            Self::Disbursement => "Erogaciones",
            Self::AppraisalFee => "Avalúo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalKind {
    /// No forgiveness applies.
    General,
    WithForgiveness,
    WithoutForgiveness,
}

impl TotalKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "Total General",
            Self::WithForgiveness => "Total con Condonación",
            Self::WithoutForgiveness => "Total sin Condonación",
        }
    }

    /// Line items that add up to this total.
    pub fn components(&self) -> &'static [Concept] {
        match self {
            Self::General | Self::WithForgiveness => &[
                Concept::AcquisitionTax,
                Concept::RegistryFee,
                Concept::NotaryFee,
                Concept::Vat,
                Concept::Disbursement,
                Concept::AppraisalFee,
            ],
            Self::WithoutForgiveness => &[
                Concept::AcquisitionTaxWithoutForgiveness,
                Concept::RegistryFeeWithoutForgiveness,
                Concept::NotaryFee,
                Concept::Vat,
                Concept::Disbursement,
                Concept::AppraisalFee,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub concept: Concept,
    pub label: String,
    pub amount: Decimal,
}

impl LineItem {
    pub fn new(
        concept: Concept,
        amount: Decimal,
    ) -> Self {
        Self {
            concept,
            label: concept.label().to_string(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Total {
    pub kind: TotalKind,
    pub label: String,
    pub amount: Decimal,
}

impl Total {
    pub fn new(
        kind: TotalKind,
        amount: Decimal,
    ) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            amount,
        }
    }
}

/// Cost report for one transaction. Every amount is already rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub line_items: Vec<LineItem>,
    pub totals: Vec<Total>,

    /// Applied forgiveness as a percentage (e.g. `60`), or `None` when no
    /// forgiveness applies.
    pub forgiveness_percent: Option<Decimal>,
}

impl CalculationResult {
    pub fn line_item(
        &self,
        concept: Concept,
    ) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.concept == concept)
    }

    /// Amount of a concept, zero when the concept is not on the report.
    pub fn amount_of(
        &self,
        concept: Concept,
    ) -> Decimal {
        self.line_item(concept).map_or(Decimal::ZERO, |item| item.amount)
    }

    pub fn total(
        &self,
        kind: TotalKind,
    ) -> Option<&Total> {
        self.totals.iter().find(|total| total.kind == kind)
    }

    /// Sum of the line items that make up `kind`.
    pub fn sum_of_components(
        &self,
        kind: TotalKind,
    ) -> Decimal {
        kind.components().iter().map(|c| self.amount_of(*c)).sum()
    }

    pub fn forgiveness_applies(&self) -> bool {
        self.forgiveness_percent.is_some()
    }
}
