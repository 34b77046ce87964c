use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{debug, warn};

use notary_cli::audit::{self, AuditAction};
use notary_cli::logging;
use notary_cli::render::ReportView;
use notary_cli::utils::{parse_amount, parse_optional_amount};
use notary_cli::RequestContext;
use notary_core::{CalculationInput, FeeCalculator, RateSchedule};
use notary_data::CalculatorConfig;

// ─── CLI definition ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Two-column concept/value report.
    Text,
    Json,
}

/// Notarial cost calculator for Mexico City property transfers.
///
/// Computes acquisition tax (ISAI), registry fees, notary fees with VAT,
/// disbursements, appraisal and the applicable forgiveness ("condonación").
#[derive(Debug, Parser)]
#[command(name = "notary-calc", version, about, long_about = None)]
struct Cli {
    /// Operation (transaction or appraisal) value, e.g. `2,000,000` or `$950000.50`.
    #[arg(long)]
    value: String,

    /// Cadastral value. Defaults to the operation value.
    #[arg(long)]
    cadastral: Option<String>,

    /// Operation type: `acquisition`/`adquisicion` or `inheritance`/`herencia`.
    #[arg(long, default_value = "acquisition")]
    operation: String,

    /// Calculator config (TOML) selecting rate editions and policy values.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Append an explanation of every concept to the text report.
    #[arg(long, default_value_t = false)]
    explain: bool,

    /// Name printed on the report header.
    #[arg(long)]
    preparer: Option<String>,

    /// Identity recorded in the audit log.
    #[arg(long, default_value = "anonymous")]
    identity: String,

    /// File that receives one audit line per request.
    #[arg(long)]
    audit_log: Option<PathBuf>,
}

fn load_rates(config: Option<&Path>) -> anyhow::Result<RateSchedule> {
    let Some(path) = config else {
        return Ok(RateSchedule::canonical().clone());
    };
    let config = CalculatorConfig::load(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    config
        .build_schedule(base_dir)
        .with_context(|| format!("Failed to build rate schedule from: {}", path.display()))
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    logging::init_logging("info");

    let cli = Cli::parse();

    if let Some(path) = &cli.audit_log {
        logging::enable_audit_file(path)?;
    }

    let rates = load_rates(cli.config.as_deref())?;
    debug!(edition = %rates.edition, "rate schedule ready");

    let operation_value = parse_amount(&cli.value).context("Invalid --value")?;
    let cadastral_value = match &cli.cadastral {
        Some(raw) => parse_optional_amount(raw).context("Invalid --cadastral")?,
        None => None,
    };

    let input = CalculationInput::from_code(operation_value, cadastral_value, &cli.operation);
    if input.operation_type.is_none() {
        warn!(operation = %cli.operation, "unrecognised operation type; no forgiveness applied");
    }
    input.validate()?;

    let ctx = RequestContext::new(cli.identity, cli.preparer);
    let result = FeeCalculator::new(&rates).calculate(&input);
    audit::record_calculation(&ctx, &input, &result);

    let view = ReportView {
        ctx: &ctx,
        input: &input,
        result: &result,
        rates: &rates,
    };
    let output = match cli.format {
        OutputFormat::Text => {
            audit::record(&ctx, AuditAction::ExportReport);
            view.to_text(cli.explain)
        }
        OutputFormat::Json => {
            audit::record(&ctx, AuditAction::ExportJson);
            view.to_json().context("Failed to serialize result")?
        }
    };
    print!("{output}");
    if cli.format == OutputFormat::Json {
        println!();
    }

    logging::disable_audit_file();
    Ok(())
}
