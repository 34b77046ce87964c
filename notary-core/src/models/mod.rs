mod bracket;
mod calculation_input;
mod calculation_result;
mod forgiveness;
mod operation_type;

pub use bracket::{AmountRule, Bracket, BracketTable, BracketTableError};
pub use calculation_input::{CalculationInput, InputError};
pub use calculation_result::{CalculationResult, Concept, LineItem, Total, TotalKind};
pub use forgiveness::{ForgivenessSchedule, ForgivenessScheduleError, ForgivenessTier};
pub use operation_type::OperationType;
