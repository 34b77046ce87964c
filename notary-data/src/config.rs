//! TOML configuration for the calculator.
//!
//! ```toml
//! edition = "cdmx-8"
//! rate_tables = "rates/cdmx-8.csv"     # relative to the config file
//! forgiveness = "rates/forgiveness.csv"
//!
//! [policy]
//! notary_markup = "0.18"
//! vat_rate = "0.16"
//! disbursement = "16000"
//! appraisal_rate = "0.00195"
//! appraisal_vat_rate = "0.16"
//! appraisal_qualifying_fractions = ["0", "0.10", "0.20"]
//! dual_total_fraction = "0.10"
//! ```
//!
//! Every key is optional. Missing keys keep the compiled-in values.

use std::fs::File;
use std::path::{Path, PathBuf};

use notary_core::{FeePolicy, RateSchedule};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::loader::{ForgivenessLoader, RateLoaderError, RateTableLoader};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("policy value '{name}' out of range: {value}")]
    InvalidKnob { name: &'static str, value: Decimal },

    #[error("rate table 'rate_tables' requires an 'edition' name")]
    MissingEdition,

    #[error(transparent)]
    Loader(#[from] RateLoaderError),
}

/// Overrides for [`FeePolicy`]; unset fields keep the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyOverrides {
    pub notary_markup: Option<Decimal>,
    pub vat_rate: Option<Decimal>,
    pub disbursement: Option<Decimal>,
    pub appraisal_rate: Option<Decimal>,
    pub appraisal_vat_rate: Option<Decimal>,
    pub appraisal_qualifying_fractions: Option<Vec<Decimal>>,
    pub dual_total_fraction: Option<Decimal>,
}

impl PolicyOverrides {
    /// Applies the overrides on top of `policy`, rejecting rates outside
    /// `[0, 1]` and negative disbursements.
    pub fn apply(
        &self,
        policy: FeePolicy,
    ) -> Result<FeePolicy, ConfigError> {
        let rate = |name: &'static str, value: Option<Decimal>, default: Decimal| {
            let value = value.unwrap_or(default);
            if value < Decimal::ZERO || value > Decimal::ONE {
                Err(ConfigError::InvalidKnob { name, value })
            } else {
                Ok(value)
            }
        };

        let disbursement = self.disbursement.unwrap_or(policy.disbursement);
        if disbursement < Decimal::ZERO {
            return Err(ConfigError::InvalidKnob {
                name: "disbursement",
                value: disbursement,
            });
        }

        let qualifying = match &self.appraisal_qualifying_fractions {
            Some(fractions) => {
                for fraction in fractions {
                    rate("appraisal_qualifying_fractions", Some(*fraction), Decimal::ZERO)?;
                }
                fractions.clone()
            }
            None => policy.appraisal_qualifying_fractions,
        };

        Ok(FeePolicy {
            notary_markup: rate("notary_markup", self.notary_markup, policy.notary_markup)?,
            vat_rate: rate("vat_rate", self.vat_rate, policy.vat_rate)?,
            disbursement,
            appraisal_rate: rate("appraisal_rate", self.appraisal_rate, policy.appraisal_rate)?,
            appraisal_vat_rate: rate(
                "appraisal_vat_rate",
                self.appraisal_vat_rate,
                policy.appraisal_vat_rate,
            )?,
            appraisal_qualifying_fractions: qualifying,
            dual_total_fraction: rate(
                "dual_total_fraction",
                self.dual_total_fraction,
                policy.dual_total_fraction,
            )?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Name of the rate-table edition supplied by `rate_tables`.
    pub edition: Option<String>,
    /// CSV file with bracket tables.
    pub rate_tables: Option<PathBuf>,
    /// CSV file with forgiveness tiers.
    pub forgiveness: Option<PathBuf>,
    #[serde(default)]
    pub policy: PolicyOverrides,
}

impl CalculatorConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Reads a config file. Relative CSV paths inside it are resolved later
    /// against the file's directory by [`CalculatorConfig::build_schedule`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "read calculator config");
        Self::from_toml_str(&contents)
    }

    /// Builds a rate schedule starting from the canonical one.
    pub fn build_schedule(
        &self,
        base_dir: &Path,
    ) -> Result<RateSchedule, ConfigError> {
        let mut schedule = RateSchedule::canonical().clone();

        if let Some(path) = &self.rate_tables {
            let edition = self.edition.as_deref().ok_or(ConfigError::MissingEdition)?;
            let records = RateTableLoader::parse(open(&base_dir.join(path))?)?;
            schedule = RateTableLoader::apply(edition, &records, schedule)?;
            info!(edition, records = records.len(), "using rate-table edition");
        }

        if let Some(path) = &self.forgiveness {
            let records = ForgivenessLoader::parse(open(&base_dir.join(path))?)?;
            schedule.forgiveness = ForgivenessLoader::build(&records)?;
        }

        let policy = self.policy.apply(schedule.policy.clone())?;
        Ok(schedule.with_policy(policy))
    }
}

fn open(path: &Path) -> Result<File, ConfigError> {
    File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
