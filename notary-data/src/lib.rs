//! Rate-table editions and calculator configuration loaded from disk.

pub mod config;
pub mod loader;

pub use config::{CalculatorConfig, ConfigError, PolicyOverrides};
pub use loader::{
    ForgivenessLoader, ForgivenessRecord, RateLoaderError, RateTableLoader, RateTableRecord,
    TableKind,
};
