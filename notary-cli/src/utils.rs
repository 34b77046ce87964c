use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a money amount.
#[derive(Debug, Error)]
pub enum ParseAmountError {
    #[error("'{0}' is not a non-negative amount (e.g. 1,250,000.00 or $950000)")]
    Malformed(String),

    #[error("invalid decimal '{input}': {source}")]
    Decimal {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// Optional `$`, digits (plain, or comma-separated in groups of three),
/// optional decimals, optional `MXN` suffix. No sign: negative amounts are
/// rejected.
static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?\s*(\d{1,3}(,\d{3})+|\d+)(\.\d+)?\s*(?i:mxn)?$")
        .expect("amount pattern is a valid regex")
});

/// Strips the currency decorations accepted by [`AMOUNT_PATTERN`].
fn normalize_amount_input(s: &str) -> String {
    s.trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Parses a user-entered amount into a [`Decimal`].
///
/// Handles comma as thousands separator, a leading `$` and a trailing `MXN`
/// (e.g. `"$1,234.56 MXN"`). Empty or whitespace-only input is treated as 0.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    if !AMOUNT_PATTERN.is_match(trimmed) {
        tracing::error!(input = %s, "rejected amount");
        return Err(ParseAmountError::Malformed(s.to_string()));
    }
    normalize_amount_input(trimmed)
        .parse()
        .map_err(|source| ParseAmountError::Decimal {
            input: s.to_string(),
            source,
        })
}

/// Parses an optional amount. Empty or whitespace-only input is `None`.
pub fn parse_optional_amount(s: &str) -> Result<Option<Decimal>, ParseAmountError> {
    if s.trim().is_empty() {
        Ok(None)
    } else {
        parse_amount(s).map(Some)
    }
}

/// Formats an amount as `$1,234,567.89 MXN`.
pub fn format_mxn(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part} MXN")
}

/// Formats an applied forgiveness percentage, using "No aplica" when `None`.
pub fn format_forgiveness(percent: Option<Decimal>) -> String {
    percent
        .map(|p| format!("{}%", p.normalize()))
        .unwrap_or_else(|| "No aplica".to_string())
}
