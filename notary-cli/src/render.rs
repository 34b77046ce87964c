//! Rendering of a calculation for people (two-column report) and for
//! machines (JSON).

use std::fmt::Write;

use notary_core::calculations::common::to_percent;
use notary_core::{CalculationInput, CalculationResult, RateSchedule};
use serde::Serialize;

use crate::context::RequestContext;
use crate::utils::{format_forgiveness, format_mxn};

const TITLE: &str = "Calculadora de Gastos Notariales";
const CONCEPT_HEADER: &str = "Concepto";
const VALUE_HEADER: &str = "Valor";
const FORGIVENESS_LABEL: &str = "Condonación Aplicada";

/// Everything a renderer needs for one request.
#[derive(Debug, Clone, Copy)]
pub struct ReportView<'a> {
    pub ctx: &'a RequestContext,
    pub input: &'a CalculationInput,
    pub result: &'a CalculationResult,
    pub rates: &'a RateSchedule,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    date: String,
    preparer: Option<&'a str>,
    edition: &'a str,
    operation_type: Option<&'static str>,
    operation_value: rust_decimal::Decimal,
    cadastral_value: rust_decimal::Decimal,
    #[serde(flatten)]
    result: &'a CalculationResult,
}

impl ReportView<'_> {
    /// Concept/value rows in report order: line items, forgiveness, totals.
    pub fn rows(&self) -> Vec<(String, String)> {
        let mut rows: Vec<(String, String)> = self
            .result
            .line_items
            .iter()
            .map(|item| (item.label.clone(), format_mxn(item.amount)))
            .collect();
        rows.push((
            FORGIVENESS_LABEL.to_string(),
            format_forgiveness(self.result.forgiveness_percent),
        ));
        rows.extend(
            self.result
                .totals
                .iter()
                .map(|total| (total.label.clone(), format_mxn(total.amount))),
        );
        rows
    }

    /// Plain-text report with a fixed header (title, date, optional
    /// preparer) and a two-column concept/value table.
    pub fn to_text(
        &self,
        explain: bool,
    ) -> String {
        let rows = self.rows();
        let width = rows
            .iter()
            .map(|(concept, _)| concept.chars().count())
            .chain([CONCEPT_HEADER.len()])
            .max()
            .unwrap_or(0);
        let value_width = rows
            .iter()
            .map(|(_, value)| value.chars().count())
            .max()
            .unwrap_or(VALUE_HEADER.len());
        let line_items = self.result.line_items.len();

        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{TITLE}");
        let _ = writeln!(out, "Fecha: {}", self.ctx.requested_at.format("%d/%m/%Y"));
        if let Some(preparer) = &self.ctx.preparer {
            let _ = writeln!(out, "Elaboró: {preparer}");
        }
        let _ = writeln!(
            out,
            "Tipo de operación: {}",
            self.input.operation_type.map_or("No reconocida", |op| op.label())
        );
        let _ = writeln!(out, "Valor de operación: {}", format_mxn(self.input.operation_value));
        let _ = writeln!(
            out,
            "Valor catastral: {}",
            format_mxn(self.input.effective_cadastral_value())
        );
        let _ = writeln!(out, "Tarifas: {}", self.rates.edition);
        let _ = writeln!(out);

        let _ = writeln!(out, "{CONCEPT_HEADER:<width$}  {VALUE_HEADER:>value_width$}");
        let _ = writeln!(out, "{}  {}", "-".repeat(width), "-".repeat(value_width));
        for (index, (concept, value)) in rows.iter().enumerate() {
            // Rule between line items + forgiveness row and the totals.
            if index == line_items + 1 {
                let _ = writeln!(out, "{}  {}", "-".repeat(width), "-".repeat(value_width));
            }
            let _ = writeln!(out, "{concept:<width$}  {value:>value_width$}");
        }

        if explain {
            let _ = writeln!(out);
            out.push_str(&self.explanation());
        }

        out
    }

    /// "Explicación de Cálculos": how each concept was obtained, using the
    /// policy values of the active rate schedule.
    pub fn explanation(&self) -> String {
        let policy = &self.rates.policy;
        let mut out = String::new();
        let _ = writeln!(out, "Explicación de Cálculos");
        let _ = writeln!(
            out,
            "- Condonación Aplicada: se verifica si la operación califica para una condonación según el tipo de operación y el valor catastral."
        );
        let _ = writeln!(
            out,
            "- Honorarios: cuota base más un porcentaje por rango de valor, con un recargo de {}%.",
            to_percent(policy.notary_markup)
        );
        let _ = writeln!(
            out,
            "- IVA: {}% sobre los honorarios calculados.",
            to_percent(policy.vat_rate)
        );
        let _ = writeln!(
            out,
            "- Impuesto Sobre Adquisición: costo fijo por rango más un factor sobre el excedente del límite inferior."
        );
        let _ = writeln!(
            out,
            "- Derechos de Registro Público: monto fijo según el rango del valor."
        );
        let _ = writeln!(
            out,
            "- Avalúo: {}‰ del valor del inmueble más {}% de IVA; sólo con condonación de {}.",
            (policy.appraisal_rate * rust_decimal::Decimal::ONE_THOUSAND).normalize(),
            to_percent(policy.appraisal_vat_rate),
            policy
                .appraisal_qualifying_fractions
                .iter()
                .map(|f| format!("{}%", to_percent(*f)))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let _ = writeln!(
            out,
            "- Erogaciones: monto fijo de {}.",
            format_mxn(policy.disbursement)
        );
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let report = JsonReport {
            date: self.ctx.requested_at.format("%Y-%m-%d").to_string(),
            preparer: self.ctx.preparer.as_deref(),
            edition: &self.rates.edition,
            operation_type: self.input.operation_type.map(|op| op.as_str()),
            operation_value: self.input.operation_value,
            cadastral_value: self.input.effective_cadastral_value(),
            result: self.result,
        };
        serde_json::to_string_pretty(&report)
    }
}
