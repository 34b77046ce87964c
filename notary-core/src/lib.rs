pub mod calculations;
pub mod models;
pub mod rates;

pub use calculations::{FeeCalculator, calculate_total};
pub use models::*;
pub use rates::{FeePolicy, RateSchedule};
