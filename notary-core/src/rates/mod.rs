//! Rate data: bracket tables, forgiveness tiers and the policy knobs.
//!
//! The compiled-in edition is [`presets::CANONICAL_EDITION`]. Other editions
//! are loaded from CSV by collaborators and assembled into a
//! [`RateSchedule`] with the same shape.

pub mod presets;

use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{BracketTable, ForgivenessSchedule};

/// Surcharge applied on top of the notary-fee bracket amount. Earlier
/// versions of the tariff charged no surcharge (0).
pub const NOTARY_FEE_MARKUP: Decimal = dec!(0.18);

/// VAT charged on the notary fee and on the appraisal.
pub const VAT_RATE: Decimal = dec!(0.16);

/// Fixed disbursements ("erogaciones").
pub const DISBURSEMENT: Decimal = dec!(16000);

/// Appraisal fee rate: 1.95 per thousand of the operation value.
pub const APPRAISAL_RATE: Decimal = dec!(0.00195);

/// The appraisal is only charged at these forgiveness fractions.
pub const APPRAISAL_QUALIFYING_FRACTIONS: [Decimal; 3] = [dec!(0), dec!(0.10), dec!(0.20)];

/// The forgiveness fraction at which a second, unforgiven total is reported.
pub const DUAL_TOTAL_FRACTION: Decimal = dec!(0.10);

/// Policy knobs that are not part of any bracket table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePolicy {
    pub notary_markup: Decimal,
    pub vat_rate: Decimal,
    pub disbursement: Decimal,
    pub appraisal_rate: Decimal,
    pub appraisal_vat_rate: Decimal,
    pub appraisal_qualifying_fractions: Vec<Decimal>,
    pub dual_total_fraction: Decimal,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            notary_markup: NOTARY_FEE_MARKUP,
            vat_rate: VAT_RATE,
            disbursement: DISBURSEMENT,
            appraisal_rate: APPRAISAL_RATE,
            appraisal_vat_rate: VAT_RATE,
            appraisal_qualifying_fractions: APPRAISAL_QUALIFYING_FRACTIONS.to_vec(),
            dual_total_fraction: DUAL_TOTAL_FRACTION,
        }
    }
}

impl FeePolicy {
    pub fn charges_appraisal(
        &self,
        fraction: Decimal,
    ) -> bool {
        self.appraisal_qualifying_fractions.contains(&fraction)
    }

    pub fn reports_dual_total(
        &self,
        fraction: Decimal,
    ) -> bool {
        fraction == self.dual_total_fraction
    }
}

/// Everything the calculator reads. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateSchedule {
    pub edition: String,
    pub acquisition_tax: BracketTable,
    pub registry_fee: BracketTable,
    pub notary_fee: BracketTable,
    pub forgiveness: ForgivenessSchedule,
    pub policy: FeePolicy,
}

static CANONICAL: LazyLock<RateSchedule> = LazyLock::new(RateSchedule::build_canonical);

impl RateSchedule {
    /// Shared canonical schedule.
    pub fn canonical() -> &'static RateSchedule {
        &CANONICAL
    }

    fn build_canonical() -> Self {
        Self {
            edition: presets::CANONICAL_EDITION.to_string(),
            acquisition_tax: presets::acquisition_tax(),
            registry_fee: presets::registry_fee(),
            notary_fee: presets::notary_fee(),
            forgiveness: presets::forgiveness(),
            policy: FeePolicy::default(),
        }
    }

    pub fn with_policy(
        mut self,
        policy: FeePolicy,
    ) -> Self {
        self.policy = policy;
        self
    }
}
