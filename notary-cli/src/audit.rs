//! Audit trail of calculator usage.
//!
//! Each request produces one line with the caller identity, the action and
//! the request timestamp, emitted on the [`AUDIT_TARGET`] target so that
//! only these lines reach the audit file.

use notary_core::{CalculationInput, CalculationResult};
use tracing::info;

use crate::context::RequestContext;
use crate::logging::AUDIT_TARGET;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Calculate,
    ExportJson,
    ExportReport,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calculate => "calculate",
            Self::ExportJson => "export_json",
            Self::ExportReport => "export_report",
        }
    }
}

/// Formats the request timestamp the way audit lines record it.
pub fn audit_timestamp(ctx: &RequestContext) -> String {
    ctx.requested_at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Records one audit line for `action`.
pub fn record(
    ctx: &RequestContext,
    action: AuditAction,
) {
    info!(
        target: AUDIT_TARGET,
        identity = %ctx.identity,
        action = action.as_str(),
        timestamp = %audit_timestamp(ctx),
        "request"
    );
}

/// Records a calculation together with its inputs and headline total.
pub fn record_calculation(
    ctx: &RequestContext,
    input: &CalculationInput,
    result: &CalculationResult,
) {
    let operation = input.operation_type.map_or("unrecognised", |op| op.as_str());
    let total = result.totals.first().map(|t| t.amount).unwrap_or_default();
    info!(
        target: AUDIT_TARGET,
        identity = %ctx.identity,
        action = AuditAction::Calculate.as_str(),
        timestamp = %audit_timestamp(ctx),
        operation,
        operation_value = %input.operation_value,
        cadastral_value = %input.effective_cadastral_value(),
        total = %total,
        "calculation"
    );
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn audit_timestamp_uses_request_time() {
        let at = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let ctx = RequestContext::at("ana@example.com", None, at);

        assert_eq!(audit_timestamp(&ctx), "2024-03-05 14:07:09");
    }

    #[test]
    fn action_names_are_stable() {
        assert_eq!(AuditAction::Calculate.as_str(), "calculate");
        assert_eq!(AuditAction::ExportJson.as_str(), "export_json");
        assert_eq!(AuditAction::ExportReport.as_str(), "export_report");
    }
}
