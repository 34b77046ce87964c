//! Cost calculations for a Mexico City property transfer.
//!
//! [`FeeCalculator`] combines the bracket tables, the forgiveness schedule and
//! the policy knobs of a [`crate::RateSchedule`] into a
//! [`crate::CalculationResult`].

pub mod common;
pub mod fee_calculator;
pub mod notary_fee;

pub use fee_calculator::{FeeCalculator, calculate_total};
pub use notary_fee::{notary_fee, vat};
